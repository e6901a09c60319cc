//! Fixed instruction wrapped around every question.

use crate::models::Question;

const QUESTION_SLOT: &str = "{question}";

const TEMPLATE: &str = "Tu es LegiMedTrav-AI, expert en réglementation algérienne de la santé et de la sécurité au travail (SST).
Réponds de manière claire et concise, et cite les textes applicables (ex : Loi 02-04, Décret 06-01).
Ne donne aucun avis médical : pour toute situation individuelle, oriente vers le médecin du travail.
Question : {question}";

/// Build the upstream prompt. The question is the only caller-controlled text
/// and is inserted verbatim at a single point.
pub fn build_prompt(question: &Question) -> String {
    TEMPLATE.replacen(QUESTION_SLOT, question.as_str(), 1)
}
