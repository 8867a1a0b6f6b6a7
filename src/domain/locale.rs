//! Fixed translation tables. Every function is a total `match` over the
//! enums, so a missing (language, type) pair fails compilation rather than
//! surfacing at runtime.

use chrono::{DateTime, Datelike, Utc};

use super::{Language, ReportType};

/// Localized display label for a document category.
pub fn type_label(language: Language, kind: ReportType) -> &'static str {
    use Language::*;
    use ReportType::*;
    match (language, kind) {
        (Arabic, Formal) => "تقرير رسمي",
        (Arabic, Letter) => "خطاب رسمي إداري",
        (Arabic, Technical) => "وثيقة فنية تخصصية",
        (Arabic, Minutes) => "محضر اجتماع رسمي",
        (Arabic, Proposal) => "مقترح مشروع متكامل",
        (Somali, Formal) => "Warbixin Rasmi ah",
        (Somali, Letter) => "Warqad Maamul",
        (Somali, Technical) => "Dukumenti Farsamo",
        (Somali, Minutes) => "Hab-maamuus Shir",
        (Somali, Proposal) => "Xaalad Mashruuc",
        (English, Formal) => "Formal Executive Report",
        (English, Letter) => "Official Business Letter",
        (English, Technical) => "Technical Specification",
        (English, Minutes) => "Minutes of Meeting",
        (English, Proposal) => "Project Proposal",
    }
}

/// Register/style name handed to the model inside the system instruction.
pub fn style_name(language: Language) -> &'static str {
    match language {
        Language::Arabic => "Arabic (Official High-Level)",
        Language::Somali => "Somali (Professional Administrative)",
        Language::English => "English (Executive Corporate)",
    }
}

/// Blocking message shown when a required field is missing.
pub fn missing_fields_message(language: Language) -> &'static str {
    match language {
        Language::Arabic => "يرجى تعبئة كافة الحقول (المرسل، المستلم، الموضوع)",
        Language::Somali => "Fadlan buuxi dhammaan goobaha (dirayaha, qaataha, mowduuca)",
        Language::English => "Please fill all fields (sender, recipient, subject).",
    }
}

/// Message for an empty refinement request.
pub fn missing_feedback_message(language: Language) -> &'static str {
    match language {
        Language::Arabic => "يرجى كتابة التعديل المطلوب",
        Language::Somali => "Fadlan qor wax-ka-beddelka aad rabto",
        Language::English => "Please describe the change you want.",
    }
}

/// Generic alert for a failed initial generation.
pub fn generation_failed_message(language: Language) -> &'static str {
    match language {
        Language::Arabic => "فشل الاتصال بمحرك الذكاء الاصطناعي.",
        Language::Somali => "Xiriirka matoorka AI wuu fashilmay.",
        Language::English => "Failed to reach the AI engine.",
    }
}

/// Generic alert for a failed refinement.
pub fn refinement_failed_message(language: Language) -> &'static str {
    match language {
        Language::Arabic => "فشل التعديل",
        Language::Somali => "Wax-ka-beddelku wuu fashilmay",
        Language::English => "The revision failed.",
    }
}

/// Content substituted for an empty-but-successful model response.
pub fn empty_response_fallback(language: Language) -> &'static str {
    match language {
        Language::Arabic => "حدث خطأ أثناء التوليد.",
        Language::Somali => "Khalad ayaa dhacay intii la curinayay.",
        Language::English => "An error occurred during generation.",
    }
}

/// Heading printed in place of a missing logo on the exported document.
pub fn document_heading(language: Language) -> &'static str {
    match language {
        Language::Arabic => "وثيقة رسمية",
        Language::Somali => "Dukumenti Rasmi ah",
        Language::English => "Official Document",
    }
}

pub fn subject_label(language: Language) -> &'static str {
    match language {
        Language::Arabic => "الموضوع",
        Language::Somali => "Mowduuca",
        Language::English => "Subject",
    }
}

pub fn reference_label(language: Language) -> &'static str {
    match language {
        Language::Arabic => "الرقم المرجعي",
        Language::Somali => "Tixraac",
        Language::English => "Ref",
    }
}

pub fn classification_label(language: Language) -> &'static str {
    match language {
        Language::Arabic => "تصنيف: سري للغاية",
        Language::Somali => "Kala-saar: Rasmi ah",
        Language::English => "Class: Official",
    }
}

pub fn closing_line(language: Language) -> &'static str {
    match language {
        Language::Arabic => "وتفضلوا بقبول فائق الاحترام والتقدير،،",
        Language::Somali => "Waxaan idiin soo gudbinay ixtiraam buuxa,",
        Language::English => "Sincerely yours,",
    }
}

pub fn footer_note(language: Language) -> &'static str {
    match language {
        Language::Arabic => "تم إصدار هذا المستند آلياً بواسطة نظام السكرتير الذكي",
        Language::Somali => "Dukumentigan waxaa si otomaatig ah u soo saaray nidaamka Smart Secretary",
        Language::English => "Automated Document Issued via Smart Secretary AI",
    }
}

fn month_name(language: Language, month: u32) -> &'static str {
    const ARABIC: [&str; 12] = [
        "يناير", "فبراير", "مارس", "أبريل", "مايو", "يونيو", "يوليو", "أغسطس", "سبتمبر",
        "أكتوبر", "نوفمبر", "ديسمبر",
    ];
    const SOMALI: [&str; 12] = [
        "Janaayo", "Febraayo", "Maarso", "Abriil", "Maajo", "Juun", "Luuliyo", "Agoosto",
        "Sebtembar", "Oktoobar", "Nofembar", "Desembar",
    ];
    const ENGLISH: [&str; 12] = [
        "January", "February", "March", "April", "May", "June", "July", "August", "September",
        "October", "November", "December",
    ];
    let idx = (month.clamp(1, 12) - 1) as usize;
    match language {
        Language::Arabic => ARABIC[idx],
        Language::Somali => SOMALI[idx],
        Language::English => ENGLISH[idx],
    }
}

/// Long-form localized date for display, export and filenames.
/// `timestamp_ms` is epoch milliseconds; out-of-range values collapse to the
/// epoch rather than failing.
pub fn long_date(language: Language, timestamp_ms: i64) -> String {
    let date = DateTime::from_timestamp_millis(timestamp_ms)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
        .date_naive();
    let month = month_name(language, date.month());
    match language {
        Language::Arabic | Language::Somali => {
            format!("{} {} {}", date.day(), month, date.year())
        }
        Language::English => format!("{} {}, {}", month, date.day(), date.year()),
    }
}
