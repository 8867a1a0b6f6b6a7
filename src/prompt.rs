//! Draft Request Builder: turns user configuration (or an existing report
//! plus feedback) into the system instruction and prompt sent to the model.

use crate::domain::{Language, Report, ReportConfig, locale};
use crate::error::AppError;

/// Assembled payload for the generation client.
#[derive(Debug, Clone)]
pub struct DraftRequest {
    pub system: String,
    pub prompt: String,
}

/// Required fields must be present before a request is built. Violations are
/// surfaced in the session's active language and nothing is sent.
pub fn validate_config(config: &ReportConfig) -> Result<(), AppError> {
    if config.topic.trim().is_empty()
        || config.recipient.trim().is_empty()
        || config.sender_name.trim().is_empty()
    {
        return Err(AppError::Validation(
            locale::missing_fields_message(config.language).to_string(),
        ));
    }
    Ok(())
}

fn system_instruction(
    language: Language,
    localized_type: &str,
    recipient: &str,
    sender_name: &str,
) -> String {
    format!(
        "You are a world-class General Secretary and Expert Report Writer with 30 years of experience.\n\
         Task: Create or refine a {localized_type} addressed to \"{recipient}\" from \"{sender_name}\".\n\
         Language: {}.\n\
         Style: Modern scientific reporting, highly professional, eloquent, and structured.\n\
         Guidelines:\n\
         - Include a professional header/salutation for {recipient}.\n\
         - The body should be clear and divided into logical paragraphs.\n\
         - End with a formal closing and include the name \"{sender_name}\" at the end as the signatory.\n\
         - For Arabic, use high-level administrative vocabulary (السيد/المحترم، نود إحاطتكم، وتفضلوا بقبول فائق الاحترام).\n\
         - DO NOT use bolding or markdown throughout the text. Use plain text with clean line breaks.",
        locale::style_name(language)
    )
}

/// Builds the initial-draft request from a complete configuration.
pub fn initial_draft(config: &ReportConfig) -> Result<DraftRequest, AppError> {
    validate_config(config)?;

    let localized_type = locale::type_label(config.language, config.kind);
    let prompt = format!(
        "Subject: {}\n\
         Context: {}\n\
         Writer (Sender): {}\n\
         Recipient: {}\n\
         Document Type: {localized_type}\n\n\
         Please draft the full professional document.",
        config.topic, config.details, config.sender_name, config.recipient
    );

    Ok(DraftRequest {
        system: system_instruction(
            config.language,
            localized_type,
            &config.recipient,
            &config.sender_name,
        ),
        prompt,
    })
}

/// Builds the refinement request: the prior content verbatim plus the
/// feedback. Topic and details are deliberately not re-included; the
/// signatory name must survive the edit.
pub fn refinement(report: &Report, feedback: &str) -> Result<DraftRequest, AppError> {
    if feedback.trim().is_empty() {
        return Err(AppError::Validation(
            locale::missing_feedback_message(report.language).to_string(),
        ));
    }

    let prompt = format!(
        "Existing content:\n\
         ---\n\
         {}\n\
         ---\n\
         Modify based on feedback: \"{feedback}\".\n\
         Maintain the official signature of \"{}\".",
        report.content, report.sender_name
    );

    Ok(DraftRequest {
        system: system_instruction(
            report.language,
            locale::type_label(report.language, report.kind),
            &report.recipient,
            &report.sender_name,
        ),
        prompt,
    })
}
