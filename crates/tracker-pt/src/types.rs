//! Payload types of the Pivotal Tracker REST API v5
//!
//! Response types decode every attribute with a default so a partial body
//! (or a zero-valued test double) still decodes, and read `null` as the
//! zero value. Request types omit empty
//! and zero values when serialized, so unset fields are never sent.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Join a project as its owner
pub const PROJECT_OWNER: &str = "owner";
/// Join a project as a regular member
pub const PROJECT_MEMBER: &str = "member";
/// Join a project as a read-only viewer
pub const PROJECT_VIEWER: &str = "viewer";

fn is_zero_u32(value: &u32) -> bool {
    *value == 0
}

fn is_zero_u64(value: &u64) -> bool {
    *value == 0
}

/// The service sends `null` for attributes that were never set
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Day on which a project's iterations start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Day {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Sunday,
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Sunday => "Sunday",
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Day {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Day::ALL
            .into_iter()
            .find(|day| day.as_str() == s)
            .ok_or_else(|| format!("unknown day `{s}`, expected one of Sunday..Saturday"))
    }
}

/// A project's native time zone
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeZone {
    /// Olson name, e.g. `America/Los_Angeles`
    pub olson_name: String,
    /// UTC offset, e.g. `-08:00`; filled in by the service
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub offset: String,
}

impl TimeZone {
    pub fn new(olson_name: impl Into<String>) -> Self {
        Self {
            olson_name: olson_name.into(),
            offset: String::new(),
        }
    }
}

/// A project as returned by the service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub version: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub iteration_length: u32,
    pub week_start_day: Option<Day>,
    #[serde(deserialize_with = "null_as_default")]
    pub point_scale: String,
    #[serde(deserialize_with = "null_as_default")]
    pub point_scale_is_custom: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub bugs_and_chores_are_estimatable: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub automatic_planning: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub enable_tasks: bool,
    pub start_date: Option<NaiveDate>,
    pub time_zone: Option<TimeZone>,
    #[serde(deserialize_with = "null_as_default")]
    pub velocity_averaged_over: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub number_of_done_iterations_to_show: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub profile_content: String,
    #[serde(deserialize_with = "null_as_default")]
    pub enable_incoming_emails: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub initial_velocity: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub project_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub public: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub atom_enabled: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub account_id: u64,

    // Read-only attributes, never sent back
    #[serde(deserialize_with = "null_as_default")]
    pub has_google_domain: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub current_iteration_number: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub current_velocity: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub current_volatility: f64,
    pub start_time: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Writable project attributes, sent on update (and embedded on create)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectRequest {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(default, skip_serializing_if = "is_zero_u32")]
    pub iteration_length: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_start_day: Option<Day>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub point_scale: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bugs_and_chores_are_estimatable: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub automatic_planning: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub enable_tasks: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<TimeZone>,
    #[serde(default, skip_serializing_if = "is_zero_u32")]
    pub velocity_averaged_over: u32,
    #[serde(default, skip_serializing_if = "is_zero_u32")]
    pub number_of_done_iterations_to_show: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub profile_content: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub enable_incoming_emails: bool,
    #[serde(default, skip_serializing_if = "is_zero_u32")]
    pub initial_velocity: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project_type: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub public: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub atom_enabled: bool,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub account_id: u64,
    /// One of [`PROJECT_OWNER`], [`PROJECT_MEMBER`], [`PROJECT_VIEWER`]
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub join_as: String,
}

/// Project creation payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectsRequest {
    /// Do not add the calling user as an owner
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub no_owner: bool,
    /// Create a new account with this name and put the project in it
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub new_account_name: String,
    #[serde(flatten)]
    pub project: ProjectRequest,
}

/// A Tracker user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub initials: String,
    #[serde(deserialize_with = "null_as_default")]
    pub username: String,
}

/// Membership of a person in an account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountMember {
    /// Same as the person's id
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub account_id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub person: Person,
    #[serde(deserialize_with = "null_as_default")]
    pub owner: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub admin: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub project_creator: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub timekeeper: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub time_enterer: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Writable account membership attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMemberRequest {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub initials: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub admin: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub project_creator: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub timekeeper: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub time_enterer: bool,
}
