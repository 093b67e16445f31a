//! crates/jobmate_core/src/settings.rs
//!
//! User preferences, persisted as one document in local storage.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::UserProfile;
use crate::persistence::{SingleSlot, SETTINGS_STORAGE_KEY};
use crate::ports::{KeyValueStore, PortResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateFormat {
    #[serde(rename = "MM/DD/YYYY")]
    MonthFirst,
    #[serde(rename = "DD/MM/YYYY")]
    DayFirst,
    #[serde(rename = "YYYY-MM-DD")]
    Iso,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeFormat {
    #[serde(rename = "12h")]
    TwelveHour,
    #[serde(rename = "24h")]
    TwentyFourHour,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppearanceSettings {
    pub theme: Theme,
    pub language: String,
    pub date_format: DateFormat,
    pub time_format: TimeFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: u32,
    pub max: u32,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPreferences {
    pub job_types: Vec<String>,
    pub work_modes: Vec<String>,
    pub salary_range: SalaryRange,
    pub preferred_locations: Vec<String>,
    pub industries: Vec<String>,
    pub experience_level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailNotifications {
    pub new_job_matches: bool,
    pub application_updates: bool,
    pub interview_reminders: bool,
    pub weekly_digest: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushNotifications {
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationFrequency {
    Instant,
    Daily,
    Weekly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSettings {
    pub email: EmailNotifications,
    pub push: PushNotifications,
    pub frequency: NotificationFrequency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoApplySettings {
    pub enabled: bool,
    pub min_match_percentage: u8,
    pub max_applications_per_day: u32,
    pub excluded_companies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_resume_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_letter_template: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileVisibility {
    Public,
    Private,
    Recruiters,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacySettings {
    pub profile_visibility: ProfileVisibility,
    pub allow_analytics: bool,
    pub two_factor_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Integration {
    pub name: String,
    pub connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connected_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub profile: UserProfile,
    pub appearance: AppearanceSettings,
    pub job_preferences: JobPreferences,
    pub notifications: NotificationSettings,
    pub auto_apply: AutoApplySettings,
    pub privacy: PrivacySettings,
    pub integrations: Vec<Integration>,
}

impl Default for UserSettings {
    fn default() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            profile: UserProfile::default(),
            appearance: AppearanceSettings {
                theme: Theme::Dark,
                language: "en".to_string(),
                date_format: DateFormat::MonthFirst,
                time_format: TimeFormat::TwelveHour,
            },
            job_preferences: JobPreferences {
                job_types: strings(&["Full-time", "Contract"]),
                work_modes: strings(&["Remote", "Hybrid"]),
                salary_range: SalaryRange {
                    min: 100_000,
                    max: 150_000,
                    currency: "USD".to_string(),
                },
                preferred_locations: strings(&["Remote"]),
                industries: strings(&["Technology"]),
                experience_level: "Senior".to_string(),
            },
            notifications: NotificationSettings {
                email: EmailNotifications {
                    new_job_matches: true,
                    application_updates: true,
                    interview_reminders: true,
                    weekly_digest: false,
                },
                push: PushNotifications { enabled: true },
                frequency: NotificationFrequency::Instant,
            },
            auto_apply: AutoApplySettings {
                enabled: false,
                min_match_percentage: 80,
                max_applications_per_day: 5,
                excluded_companies: Vec::new(),
                default_resume_id: None,
                cover_letter_template: None,
            },
            privacy: PrivacySettings {
                profile_visibility: ProfileVisibility::Recruiters,
                allow_analytics: true,
                two_factor_enabled: false,
            },
            integrations: ["LinkedIn", "Google Calendar", "GitHub"]
                .into_iter()
                .map(|name| Integration {
                    name: name.to_string(),
                    connected: false,
                    connected_at: None,
                })
                .collect(),
        }
    }
}

/// Replaces one section of the settings document.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsUpdate {
    Profile(UserProfile),
    Appearance(AppearanceSettings),
    JobPreferences(JobPreferences),
    Notifications(NotificationSettings),
    AutoApply(AutoApplySettings),
    Privacy(PrivacySettings),
}

impl UserSettings {
    pub fn apply(&mut self, update: SettingsUpdate) {
        match update {
            SettingsUpdate::Profile(profile) => self.profile = profile,
            SettingsUpdate::Appearance(appearance) => self.appearance = appearance,
            SettingsUpdate::JobPreferences(prefs) => self.job_preferences = prefs,
            SettingsUpdate::Notifications(notifications) => self.notifications = notifications,
            SettingsUpdate::AutoApply(auto_apply) => self.auto_apply = auto_apply,
            SettingsUpdate::Privacy(privacy) => self.privacy = privacy,
        }
    }
}

/// The settings page's store: loads once, saves after every section update.
pub struct SettingsStore {
    slot: SingleSlot<UserSettings>,
    current: UserSettings,
}

impl SettingsStore {
    pub fn open(store: Arc<dyn KeyValueStore>) -> Self {
        let slot = SingleSlot::new(store, SETTINGS_STORAGE_KEY);
        let current = slot.load().unwrap_or_default();
        Self { slot, current }
    }

    pub fn settings(&self) -> &UserSettings {
        &self.current
    }

    pub fn update(&mut self, update: SettingsUpdate) -> PortResult<&UserSettings> {
        self.current.apply(update);
        self.slot.save(&self.current)?;
        Ok(&self.current)
    }
}
