//! Markup and messages shown in a response area.

use crate::client::AskError;

pub const THINKING_MESSAGE: &str = "LegiMedTrav-AI réfléchit...";
pub const NO_ANSWER_MESSAGE: &str = "Aucune réponse reçue.";
pub const TIMEOUT_MESSAGE: &str = "⏱️ Délai d'attente dépassé. Veuillez réessayer.";
pub const CONNECTIVITY_MESSAGE: &str = "❌ Impossible de contacter l'IA. Vérifiez votre connexion.";
pub const COPY_LABEL: &str = "Copier la réponse";
pub const COPIED_LABEL: &str = "✅ Copié !";
pub const COPY_FAILED_MESSAGE: &str =
    "Impossible de copier le texte. Veuillez le sélectionner manuellement.";

/// Escape text for a backtick-delimited script string literal.
///
/// Backslashes go first so the escapes added for `` ` `` and `$` survive.
pub fn escape_template_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '`' => out.push_str("\\`"),
            '$' => out.push_str("\\$"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape text for a double-quoted HTML attribute value.
pub fn escape_attribute(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Script invoked by the copy control; reproduces `text` exactly once parsed.
pub fn copy_action(text: &str) -> String {
    format!("copyToClipboard(this, `{}`)", escape_template_literal(text))
}

/// Answer block plus copy control. The answer itself is service-provided
/// HTML and is inserted as-is.
pub fn render_answer(text: &str) -> String {
    format!(
        "<div class=\"ai-answer-box\"><strong>✨ LegiMedTrav-AI :</strong><br>{text}</div>\
         <button class=\"copy-btn\" onclick=\"{action}\">{label}</button>",
        action = escape_attribute(&copy_action(text)),
        label = COPY_LABEL,
    )
}

/// User-facing wording for a failed ask.
pub fn error_message(err: &AskError) -> String {
    match err {
        AskError::Timeout(_) => TIMEOUT_MESSAGE.to_string(),
        AskError::Transport(_) | AskError::MalformedResponse(_) => CONNECTIVITY_MESSAGE.to_string(),
        AskError::Server {
            message: Some(message),
            ..
        } => format!("❌ Erreur : {message}"),
        AskError::Server {
            status,
            message: None,
        } => format!("❌ Erreur : Échec de la requête (HTTP {status})."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    /// Undo `escape_template_literal` the way a script engine reads the literal.
    fn unescape_template_literal(escaped: &str) -> String {
        let mut out = String::new();
        let mut chars = escaped.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn template_literal_escaping_covers_delimiters_and_interpolation() {
        let text = r"Article `5` coûte ${prix} \ Loi 02-04";
        let escaped = escape_template_literal(text);

        assert_eq!(escaped, r"Article \`5\` coûte \${prix} \\ Loi 02-04");
        assert_eq!(unescape_template_literal(&escaped), text);
    }

    #[test]
    fn rendered_answer_embeds_text_and_copy_control() {
        let html = render_answer("<p>Tous les 6 mois selon la Loi 02-04.</p>");

        assert!(html.contains("✨ LegiMedTrav-AI :"));
        assert!(html.contains("<p>Tous les 6 mois selon la Loi 02-04.</p></div>"));
        assert!(html.contains("onclick=\"copyToClipboard(this, `&lt;p&gt;Tous"));
        assert!(html.ends_with(">Copier la réponse</button>"));
    }

    #[test]
    fn quotes_cannot_escape_the_attribute() {
        let html = render_answer(r#"Dites "stop" & partez"#);
        let onclick = html.split("onclick=\"").nth(1).unwrap();
        let value = &onclick[..onclick.find('"').unwrap()];

        assert!(value.contains("&quot;stop&quot; &amp; partez"));
    }

    #[test]
    fn error_wording_per_kind() {
        assert_eq!(
            error_message(&AskError::Timeout(Duration::from_secs(12))),
            TIMEOUT_MESSAGE
        );
        assert_eq!(
            error_message(&AskError::Transport("refused".into())),
            CONNECTIVITY_MESSAGE
        );
        assert_eq!(
            error_message(&AskError::Server {
                status: 400,
                message: Some("Requête JSON invalide.".into())
            }),
            "❌ Erreur : Requête JSON invalide."
        );
        assert_eq!(
            error_message(&AskError::Server {
                status: 502,
                message: None
            }),
            "❌ Erreur : Échec de la requête (HTTP 502)."
        );
    }
}
