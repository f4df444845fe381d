//! Keyword detectors run against every step
//!
//! Detectors are independent and non-exclusive. Keywords are matched on
//! lowercased text; values are lifted from the original text so case survives.

use super::{ElementKind, IntentType, SemanticIntent};
use crate::model::{ActionKind, Step};
use crate::parser::text::value_text;
use crate::util::text::{contains_any, first_quoted, truncate_chars};
use regex::Regex;
use std::sync::OnceLock;

const NAVIGATION_WORDS: &[&str] = &["navigate", "go to", "open", "visit", "browse"];
const URL_DATA_KEYS: &[&str] = &["url", "link", "address", "site"];
const PLATFORM_HOME_PAGES: &[(&str, &str)] = &[
    ("salesforce", "https://login.salesforce.com"),
    ("sap", "https://sap.com"),
    ("workday", "https://workday.com"),
    ("servicenow", "https://servicenow.com"),
];

const USERNAME_WORDS: &[&str] = &["username", "user name", "email", "user id", "login", "account"];
const PASSWORD_WORDS: &[&str] = &["password", "pwd", "passcode", "secret"];
const LOGIN_WORDS: &[&str] = &["login", "sign in", "log in", "authenticate"];
const PRESS_WORDS: &[&str] = &["click", "press", "tap", "button"];

const INPUT_WORDS: &[&str] = &["enter", "type", "input", "fill"];
const CLICK_WORDS: &[&str] = &["click", "press", "tap", "select"];
const SELECTION_WORDS: &[&str] = &["select", "choose", "pick", "dropdown", "list"];
const VERIFICATION_WORDS: &[&str] = &["verify", "check", "assert", "confirm", "validate", "ensure"];
const WAIT_WORDS: &[&str] = &["wait", "pause", "delay", "sleep"];

const GENERIC_CONTEXT_CHARS: usize = 100;
const URL_TRAILING: &[char] = &['.', ',', ';', ':', ')', '!', '?', '"', '\''];

struct Patterns {
    urls: Vec<Regex>,
    email: Regex,
    duration: Regex,
    element_names: Vec<Regex>,
    expected_values: Vec<Regex>,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let compile = |p: &str| Regex::new(p).expect("valid regex");
        Patterns {
            urls: [
                r"(?i)https?://\S+",
                r"(?i)www\.\S+",
                r"(?i)\S+\.[a-z]{2,}[/\w]*",
            ]
            .into_iter()
            .map(compile)
            .collect(),
            email: compile(r"[\w.-]+@[\w.-]+\.\w+"),
            duration: compile(r"(?i)(\d+)\s*(milliseconds?|ms|seconds?|secs?|minutes?|mins?)\b"),
            element_names: [
                r"(?i)click\s+(?:on\s+)?(?:the\s+)?(\w+(?:\s+\w+)*?)\s+button",
                r"(?i)press\s+(?:the\s+)?(\w+(?:\s+\w+)*)",
                r"(?i)tap\s+(?:on\s+)?(?:the\s+)?(\w+(?:\s+\w+)*)",
                r"(?i)(\w+(?:\s+\w+)*?)\s+button",
            ]
            .into_iter()
            .map(compile)
            .collect(),
            expected_values: [
                r"(?i)should\s+(?:be|show|display)\s+([^\n\r.]+)",
                r"(?i)expected\s+(?:to\s+)?(?:be|show|display)\s+([^\n\r.]+)",
                r"(?i)verify\s+(?:that\s+)?([^\n\r.]+)",
            ]
            .into_iter()
            .map(compile)
            .collect(),
        }
    })
}

/// Lowercased and original views of a step's text
struct StepText<'a> {
    step: &'a Step,
    description: &'a str,
    lower: String,
    expected: &'a str,
    expected_lower: String,
}

impl<'a> StepText<'a> {
    fn new(step: &'a Step) -> Self {
        let expected = step.expected_result.as_deref().unwrap_or("");
        Self {
            step,
            description: step.description.as_str(),
            lower: step.description.to_lowercase(),
            expected,
            expected_lower: expected.to_lowercase(),
        }
    }

    fn mentions(&self, words: &[&str]) -> bool {
        contains_any(&self.lower, words)
    }

    /// First test-data value whose key contains one of `key_words`
    fn data_value_for(&self, key_words: &[&str]) -> Option<String> {
        self.step
            .test_data
            .iter()
            .find(|(k, _)| contains_any(&k.to_lowercase(), key_words))
            .map(|(_, v)| value_text(v))
            .filter(|v| !v.is_empty())
    }

    fn first_data_value(&self) -> Option<String> {
        self.step
            .test_data
            .values()
            .next()
            .map(value_text)
            .filter(|v| !v.is_empty())
    }
}

/// Runs every detector over `step`, falling back to one generic intent when
/// none fires and the description is non-empty.
pub fn detect(step: &Step) -> Vec<SemanticIntent> {
    let text = StepText::new(step);
    let mut intents = Vec::new();

    intents.extend(navigation(&text));
    intents.extend(username(&text));
    intents.extend(password(&text));
    intents.extend(login_button(&text));
    intents.extend(form_input(&text));
    intents.extend(click(&text));
    intents.extend(selection(&text));
    intents.extend(verification(&text));
    intents.extend(wait(&text));

    if intents.is_empty() {
        intents.extend(generic(&text));
    }
    intents
}

fn find_url(text: &str) -> Option<String> {
    patterns()
        .urls
        .iter()
        .find_map(|re| re.find(text))
        .map(|m| m.as_str().trim_end_matches(URL_TRAILING).to_string())
        .filter(|u| !u.is_empty())
}

fn navigation(text: &StepText) -> Option<SemanticIntent> {
    if !text.mentions(NAVIGATION_WORDS) {
        return None;
    }

    let concrete = find_url(text.description).or_else(|| text.data_value_for(URL_DATA_KEYS));
    let inferred = PLATFORM_HOME_PAGES
        .iter()
        .find(|(platform, _)| text.lower.contains(platform))
        .map(|(_, url)| url.to_string());

    let (value, confidence) = match (concrete, inferred) {
        (Some(url), _) if url.to_lowercase().starts_with("http") => (Some(url), 0.9),
        (Some(url), _) => (Some(url), 0.8),
        (None, Some(url)) => (Some(url), 0.7),
        (None, None) => (None, 0.6),
    };

    let context = match &value {
        Some(url) => format!("Navigate to {}", url),
        None => "Navigate to page".to_string(),
    };
    Some(SemanticIntent::new(
        IntentType::Navigation,
        ElementKind::Page,
        ActionKind::Navigate,
        value,
        context,
        confidence,
    ))
}

fn username(text: &StepText) -> Option<SemanticIntent> {
    if !text.mentions(USERNAME_WORDS) {
        return None;
    }

    let value = text.data_value_for(USERNAME_WORDS).or_else(|| {
        patterns()
            .email
            .find(text.description)
            .map(|m| m.as_str().to_string())
    });
    let confidence = if value.is_some() { 0.9 } else { 0.7 };

    Some(SemanticIntent::new(
        IntentType::Authentication,
        ElementKind::UsernameField,
        ActionKind::Input,
        value,
        "Enter username/email for login",
        confidence,
    ))
}

fn password(text: &StepText) -> Option<SemanticIntent> {
    if !text.mentions(PASSWORD_WORDS) {
        return None;
    }

    let value = text.data_value_for(PASSWORD_WORDS);
    let confidence = if value.is_some() { 0.9 } else { 0.7 };

    Some(SemanticIntent::new(
        IntentType::Authentication,
        ElementKind::PasswordField,
        ActionKind::Input,
        value,
        "Enter password for login",
        confidence,
    ))
}

fn login_button(text: &StepText) -> Option<SemanticIntent> {
    if !(text.mentions(LOGIN_WORDS) && text.mentions(PRESS_WORDS)) {
        return None;
    }

    Some(SemanticIntent::new(
        IntentType::Authentication,
        ElementKind::LoginButton,
        ActionKind::Click,
        None,
        "Click login/sign in button",
        0.9,
    ))
}

fn form_input(text: &StepText) -> Option<SemanticIntent> {
    if !text.mentions(INPUT_WORDS) {
        return None;
    }

    let field = if text.mentions(&["name", "title"]) {
        ElementKind::NameField
    } else if text.mentions(&["amount", "price", "number"]) {
        ElementKind::NumberField
    } else if text.mentions(&["date", "time"]) {
        ElementKind::DateField
    } else if text.mentions(&["description", "comment", "note"]) {
        ElementKind::Textarea
    } else {
        ElementKind::TextField
    };

    let value = text
        .first_data_value()
        .or_else(|| first_quoted(text.description));
    let confidence = if value.is_some() { 0.8 } else { 0.6 };

    Some(SemanticIntent::new(
        IntentType::FormInteraction,
        field,
        ActionKind::Input,
        value,
        format!("Enter value into {}", field),
        confidence,
    ))
}

fn element_name(description: &str) -> Option<String> {
    first_quoted(description).or_else(|| {
        patterns()
            .element_names
            .iter()
            .find_map(|re| re.captures(description))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|name| !name.is_empty())
    })
}

fn click_category(name: Option<&str>, text: &StepText) -> IntentType {
    let context = format!(
        "{} {} {}",
        name.unwrap_or("").to_lowercase(),
        text.lower,
        text.expected_lower
    );

    let table: [(&[&str], IntentType); 6] = [
        (&["login", "sign in", "authenticate"], IntentType::Authentication),
        (&["save", "submit", "create", "add"], IntentType::FormSubmission),
        (&["search", "find", "filter"], IntentType::SearchInteraction),
        (&["menu", "nav", "launcher", "tab"], IntentType::Navigation),
        (&["delete", "remove", "cancel"], IntentType::DestructiveAction),
        (&["edit", "modify", "update"], IntentType::EditAction),
    ];

    table
        .iter()
        .find(|(words, _)| contains_any(&context, words))
        .map(|(_, kind)| *kind)
        .unwrap_or(IntentType::UiInteraction)
}

fn click(text: &StepText) -> Option<SemanticIntent> {
    if !text.mentions(CLICK_WORDS) {
        return None;
    }

    let element = if text.mentions(&["link", "hyperlink"]) {
        ElementKind::Link
    } else if text.mentions(&["tab", "menu"]) {
        ElementKind::MenuItem
    } else if text.mentions(&["checkbox", "check box"]) {
        ElementKind::Checkbox
    } else if text.mentions(&["radio", "option"]) {
        ElementKind::RadioButton
    } else {
        ElementKind::Button
    };

    let name = element_name(text.description);
    let intent_type = click_category(name.as_deref(), text);
    let confidence = if name.is_some() { 0.8 } else { 0.6 };
    let context = match &name {
        Some(n) => format!("Click {}: {}", element, n),
        None => format!("Click {}", element),
    };

    Some(SemanticIntent::new(
        intent_type,
        element,
        ActionKind::Click,
        name,
        context,
        confidence,
    ))
}

fn selection(text: &StepText) -> Option<SemanticIntent> {
    if !text.mentions(SELECTION_WORDS) {
        return None;
    }

    let element = if text.mentions(&["list", "listbox"]) {
        ElementKind::Listbox
    } else if text.mentions(&["combo", "combobox"]) {
        ElementKind::Combobox
    } else {
        ElementKind::Dropdown
    };

    let value = text
        .first_data_value()
        .or_else(|| first_quoted(text.description));
    let confidence = if value.is_some() { 0.8 } else { 0.6 };

    Some(SemanticIntent::new(
        IntentType::FormInteraction,
        element,
        ActionKind::Select,
        value,
        format!("Select value from {}", element),
        confidence,
    ))
}

fn expected_value(text: &str) -> Option<String> {
    first_quoted(text).or_else(|| {
        patterns()
            .expected_values
            .iter()
            .find_map(|re| re.captures(text))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|v| !v.is_empty())
    })
}

fn verification(text: &StepText) -> Option<SemanticIntent> {
    let combined_lower = format!("{} {}", text.lower, text.expected_lower);
    if !contains_any(&combined_lower, VERIFICATION_WORDS) {
        return None;
    }

    let (intent_type, element) =
        if contains_any(&combined_lower, &["login", "logged in", "authenticated"]) {
            (IntentType::AuthenticationVerification, ElementKind::LoginStatus)
        } else if contains_any(&combined_lower, &["page", "displayed", "shown", "loaded"]) {
            (IntentType::PageVerification, ElementKind::Page)
        } else if contains_any(&combined_lower, &["message", "text", "content"]) {
            (IntentType::ContentVerification, ElementKind::TextElement)
        } else if contains_any(&combined_lower, &["error", "warning", "alert"]) {
            (IntentType::ErrorVerification, ElementKind::ErrorMessage)
        } else {
            (IntentType::GeneralVerification, ElementKind::Page)
        };

    let combined = format!("{} {}", text.description, text.expected);
    let value = expected_value(&combined);
    let confidence = if value.is_some() { 0.8 } else { 0.6 };

    Some(SemanticIntent::new(
        intent_type,
        element,
        ActionKind::Verify,
        value,
        format!("Verify {}", intent_type),
        confidence,
    ))
}

fn wait(text: &StepText) -> Option<SemanticIntent> {
    if !text.mentions(WAIT_WORDS) {
        return None;
    }

    let duration = patterns()
        .duration
        .find(text.description)
        .map(|m| m.as_str().to_string());

    let condition = if text.mentions(&["load", "loading", "loaded"]) {
        "page_load_wait"
    } else if text.mentions(&["element", "appear", "visible"]) {
        "element_wait"
    } else {
        "explicit_wait"
    };
    let confidence = if duration.is_some() { 0.8 } else { 0.6 };

    Some(SemanticIntent::new(
        IntentType::Timing,
        ElementKind::Page,
        ActionKind::Wait,
        duration,
        format!("Wait for condition: {}", condition),
        confidence,
    ))
}

fn generic(text: &StepText) -> Option<SemanticIntent> {
    if text.description.trim().is_empty() {
        return None;
    }

    let intent_type = match text.step.action {
        ActionKind::Navigate => IntentType::Navigation,
        ActionKind::Input | ActionKind::Select => IntentType::FormInteraction,
        ActionKind::Verify | ActionKind::Verification => IntentType::Verification,
        ActionKind::Wait => IntentType::Timing,
        _ => IntentType::UiInteraction,
    };

    Some(SemanticIntent::new(
        intent_type,
        ElementKind::GenericElement,
        text.step.action,
        text.first_data_value(),
        truncate_chars(text.description, GENERIC_CONTEXT_CHARS),
        0.5,
    ))
}
