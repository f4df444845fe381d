//! Static platform profiles
//!
//! The registry is built once per process and shared read-only. Patterns are
//! plain data; URL patterns are compiled case-insensitively at build time.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Id of the low-specificity profile chosen when nothing else matches
pub const FALLBACK_PLATFORM: &str = "generic_web";

/// How automation should approach a platform's UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationHints {
    pub common_selectors: Vec<String>,
    pub wait_strategies: Vec<String>,
    pub iframe_handling: String,
    pub shadow_dom: bool,
}

struct HintsDef {
    common_selectors: &'static [&'static str],
    wait_strategies: &'static [&'static str],
    iframe_handling: &'static str,
    shadow_dom: bool,
}

impl HintsDef {
    fn build(&self) -> AutomationHints {
        AutomationHints {
            common_selectors: self.common_selectors.iter().map(|s| s.to_string()).collect(),
            wait_strategies: self.wait_strategies.iter().map(|s| s.to_string()).collect(),
            iframe_handling: self.iframe_handling.to_string(),
            shadow_dom: self.shadow_dom,
        }
    }
}

struct ProfileDef {
    id: &'static str,
    name: &'static str,
    url_patterns: &'static [&'static str],
    ui_patterns: &'static [&'static str],
    terminology: &'static [&'static str],
    element_patterns: &'static [&'static str],
    hints: Option<HintsDef>,
}

const GENERIC_HINTS: HintsDef = HintsDef {
    common_selectors: &["button", "input", ".btn", "#submit"],
    wait_strategies: &["page_load", "dom_ready"],
    iframe_handling: "standard",
    shadow_dom: false,
};

const PROFILES: &[ProfileDef] = &[
    ProfileDef {
        id: "salesforce_lightning",
        name: "Salesforce Lightning",
        url_patterns: &[
            r".*\.salesforce\.com",
            r".*\.lightning\.force\.com",
            r".*\.my\.salesforce\.com",
            r"login\.salesforce\.com",
        ],
        ui_patterns: &["app launcher", "lightning", "setup", "waffle", "nine dots"],
        terminology: &[
            "opportunity", "lead", "account", "contact", "case", "campaign", "chatter",
            "trailhead", "org", "salesforce",
        ],
        element_patterns: &[
            "slds-", "lightning-", "forceActionsText", "oneHeader", "appLauncher", "globalHeader",
        ],
        hints: Some(HintsDef {
            common_selectors: &[
                "[data-aura-class]",
                ".slds-button",
                "lightning-input",
                ".forceActionLink",
            ],
            wait_strategies: &["lightning_page_load", "aura_component_ready"],
            iframe_handling: "lightning_containers",
            shadow_dom: true,
        }),
    },
    ProfileDef {
        id: "salesforce_classic",
        name: "Salesforce Classic",
        url_patterns: &[r".*\.salesforce\.com", r"c\..*\.visual\.force\.com"],
        ui_patterns: &["home tab", "classic", "sidebar", "setup menu"],
        terminology: &[
            "opportunity", "lead", "account", "contact", "case", "campaign", "salesforce", "setup",
        ],
        element_patterns: &["bPageBlock", "pbSubheader", "bodyCell", "dataCol", "relatedListStyle"],
        hints: Some(HintsDef {
            common_selectors: &[".btn", ".dataCol", ".pbButton"],
            wait_strategies: &["page_load", "form_ready"],
            iframe_handling: "standard",
            shadow_dom: false,
        }),
    },
    ProfileDef {
        id: "sap_fiori",
        name: "SAP Fiori",
        url_patterns: &[r".*\.sap\.com", r".*fiori.*", r".*\.sapfiori\.com"],
        ui_patterns: &["fiori", "launchpad", "tile", "shell bar"],
        terminology: &[
            "fiori", "launchpad", "tile", "sap", "s4hana", "shell", "workbench", "transaction",
        ],
        element_patterns: &["sapM", "sapUi", "fiori", "sapShell", "sapSplitter"],
        hints: Some(HintsDef {
            common_selectors: &["[id*='sapM']", ".sapMBtn", ".sapUiIcon"],
            wait_strategies: &["ui5_ready", "component_load"],
            iframe_handling: "ui5_containers",
            shadow_dom: false,
        }),
    },
    ProfileDef {
        id: "sap_gui",
        name: "SAP GUI",
        url_patterns: &[r".*\.sap\.com", r".*gui.*"],
        ui_patterns: &["sap gui", "easy access", "transaction", "menu bar"],
        terminology: &[
            "transaction", "tcode", "sap gui", "easy access", "menu", "sap", "workbench",
        ],
        element_patterns: &["GuiApplication", "GuiConnection", "GuiSession", "wnd[0]", "usr/"],
        hints: None,
    },
    ProfileDef {
        id: "workday",
        name: "Workday",
        url_patterns: &[r".*\.workday\.com", r".*\.wd\d+\.myworkday\.com"],
        ui_patterns: &["workday", "dashboard", "inbox", "actions"],
        terminology: &[
            "workday", "employee", "manager", "dashboard", "inbox", "actions", "reports", "tenant",
        ],
        element_patterns: &["wd-", "workday", "WDCU", "WDControl"],
        hints: Some(HintsDef {
            common_selectors: &["[data-automation-id]", ".wd-", "[aria-label]"],
            wait_strategies: &["workday_load", "component_ready"],
            iframe_handling: "workday_frames",
            shadow_dom: true,
        }),
    },
    ProfileDef {
        id: "servicenow",
        name: "ServiceNow",
        url_patterns: &[r".*\.servicenow\.com", r".*\.service-now\.com"],
        ui_patterns: &["servicenow", "incident", "ticket", "application navigator"],
        terminology: &[
            "servicenow", "incident", "ticket", "cmdb", "change request", "service catalog",
        ],
        element_patterns: &["sn-", "servicenow", "gsft_main", "navpage"],
        hints: None,
    },
    ProfileDef {
        id: "microsoft_dynamics",
        name: "Microsoft Dynamics",
        url_patterns: &[r".*\.dynamics\.com", r".*\.crm\.dynamics\.com"],
        ui_patterns: &["dynamics", "crm", "ribbon", "command bar"],
        terminology: &["dynamics", "crm", "entity", "form", "view", "ribbon", "workflow"],
        element_patterns: &["ms-crm", "dynamics", "crmGrid", "crmForm"],
        hints: None,
    },
    ProfileDef {
        id: "oracle_cloud",
        name: "Oracle Cloud",
        url_patterns: &[r".*\.oraclecloud\.com", r".*\.oracle\.com"],
        ui_patterns: &["oracle", "cloud", "navigator", "dashboard"],
        terminology: &["oracle", "cloud", "fusion", "navigator", "dashboard", "workspace"],
        element_patterns: &["af_", "oracle", "adf", "af:", "trinidad"],
        hints: None,
    },
    ProfileDef {
        id: FALLBACK_PLATFORM,
        name: "Generic Web Application",
        url_patterns: &[r"https?://.*"],
        ui_patterns: &["button", "form", "input", "login"],
        terminology: &["login", "submit", "form", "button", "input", "page"],
        element_patterns: &["btn", "form", "input", "div", "span", "a"],
        hints: Some(GENERIC_HINTS),
    },
];

#[derive(Debug, Clone)]
pub struct PlatformProfile {
    pub id: &'static str,
    pub name: &'static str,
    pub url_patterns: Vec<Regex>,
    pub ui_patterns: &'static [&'static str],
    pub terminology: &'static [&'static str],
    pub element_patterns: &'static [&'static str],
    pub hints: AutomationHints,
}

impl PlatformProfile {
    fn from_def(def: &ProfileDef) -> Self {
        let url_patterns = def
            .url_patterns
            .iter()
            .map(|p| Regex::new(&format!("(?i){}", p)).expect("valid regex"))
            .collect();

        Self {
            id: def.id,
            name: def.name,
            url_patterns,
            ui_patterns: def.ui_patterns,
            terminology: def.terminology,
            element_patterns: def.element_patterns,
            hints: def.hints.as_ref().unwrap_or(&GENERIC_HINTS).build(),
        }
    }

    /// Source text of a URL pattern, without the case-insensitivity flag
    pub fn url_pattern_source(re: &Regex) -> &str {
        re.as_str().trim_start_matches("(?i)")
    }

    /// True when `value` appears in any of this profile's pattern lists.
    ///
    /// Attribution is by value, so a keyword shared by two profiles credits both.
    pub fn lists_value(&self, value: &str) -> bool {
        self.url_patterns
            .iter()
            .any(|re| Self::url_pattern_source(re) == value)
            || self.ui_patterns.contains(&value)
            || self.terminology.contains(&value)
            || self.element_patterns.contains(&value)
    }

    pub fn is_fallback(&self) -> bool {
        self.id == FALLBACK_PLATFORM
    }
}

#[derive(Debug)]
pub struct PlatformRegistry {
    profiles: Vec<PlatformProfile>,
    fallback: usize,
}

impl PlatformRegistry {
    /// Registry with the built-in profiles, in their fixed precedence order
    pub fn with_defaults() -> Self {
        let profiles: Vec<PlatformProfile> =
            PROFILES.iter().map(PlatformProfile::from_def).collect();
        let fallback = profiles
            .iter()
            .position(PlatformProfile::is_fallback)
            .unwrap_or(profiles.len() - 1);
        Self { profiles, fallback }
    }

    /// Process-wide registry, built on first use
    pub fn global() -> &'static PlatformRegistry {
        static REGISTRY: OnceLock<PlatformRegistry> = OnceLock::new();
        REGISTRY.get_or_init(PlatformRegistry::with_defaults)
    }

    pub fn profiles(&self) -> &[PlatformProfile] {
        &self.profiles
    }

    pub fn get(&self, id: &str) -> Option<&PlatformProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    pub fn fallback(&self) -> &PlatformProfile {
        &self.profiles[self.fallback]
    }

    /// Resolves a caller hint such as `"Salesforce"` or `"sap-fiori"`.
    ///
    /// Exact ids win; otherwise the first profile whose id starts with the
    /// normalized hint.
    pub fn resolve_hint(&self, hint: &str) -> Option<&PlatformProfile> {
        let normalized = hint.trim().to_lowercase().replace([' ', '-'], "_");
        if normalized.is_empty() {
            return None;
        }
        self.get(&normalized).or_else(|| {
            self.profiles
                .iter()
                .find(|p| p.id.starts_with(normalized.as_str()))
        })
    }
}
