//! Google Calendar collaborators.
//!
//! A [`GoogleSession`] is acquired once per run from an authorized-user
//! credentials file and handed to [`GoogleCalendar`], which implements the
//! engine's read and write seams plus the lookups the other subcommands use.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use slot_engine::error::Result as EngineResult;
use slot_engine::{
    AttendeeBusyMap, BookingRequest, BusyPeriod, CalendarRead, CalendarWrite, CreatedEvent,
    DayWindow, SchedulingError,
};
use tracing::{debug, warn};

const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// How far ahead `search` looks for matching events.
pub const SEARCH_HORIZON_DAYS: i64 = 93;

/// The authorized-user JSON written by Google's installed-app flow.
#[derive(Debug, Deserialize)]
struct AuthorizedUser {
    client_id: String,
    client_secret: String,
    refresh_token: String,
    token_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// An authenticated handle to the Calendar API, valid for one run.
pub struct GoogleSession {
    http: Client,
    access_token: String,
    api_base: String,
}

impl GoogleSession {
    /// Exchange the refresh token in `credentials` for an access token.
    pub fn acquire(credentials: &Path, api_base: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(credentials).with_context(|| {
            format!("Failed to read Google credentials: {}", credentials.display())
        })?;
        let user: AuthorizedUser = serde_json::from_str(&raw).with_context(|| {
            format!(
                "Google credentials are not an authorized-user file: {}",
                credentials.display()
            )
        })?;

        let http = Client::new();
        let token_uri = user.token_uri.as_deref().unwrap_or(GOOGLE_TOKEN_URI);
        debug!(token_uri, "refreshing Google access token");

        let response = http
            .post(token_uri)
            .form(&[
                ("client_id", user.client_id.as_str()),
                ("client_secret", user.client_secret.as_str()),
                ("refresh_token", user.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .context("Token refresh request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            anyhow::bail!("Token refresh failed ({}): {}", status, body);
        }
        let token: TokenResponse = response.json().context("Failed to parse token response")?;

        Ok(Self::with_token(token.access_token, api_base))
    }

    /// A session around an access token obtained elsewhere.
    pub fn with_token(access_token: impl Into<String>, api_base: &str) -> Self {
        Self {
            http: Client::new(),
            access_token: access_token.into(),
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.http
            .get(format!("{}{}", self.api_base, path))
            .bearer_auth(&self.access_token)
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.http
            .post(format!("{}{}", self.api_base, path))
            .bearer_auth(&self.access_token)
    }
}

/// Send `request` and decode a JSON body, mapping every failure to
/// `UpstreamUnavailable`.
fn fetch<T: DeserializeOwned>(request: RequestBuilder, what: &str) -> EngineResult<T> {
    let response = request
        .send()
        .map_err(|e| SchedulingError::UpstreamUnavailable(format!("{what}: {e}")))?;
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().unwrap_or_default();
        return Err(SchedulingError::UpstreamUnavailable(format!(
            "{what} failed ({status}): {body}"
        )));
    }
    response
        .json()
        .map_err(|e| SchedulingError::UpstreamUnavailable(format!("{what}: bad response: {e}")))
}

// ── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct FreeBusyResponse {
    #[serde(default)]
    calendars: HashMap<String, FreeBusyCalendar>,
}

#[derive(Debug, Deserialize)]
struct FreeBusyCalendar {
    #[serde(default)]
    busy: Vec<BusyPeriod>,
    #[serde(default)]
    errors: Vec<FreeBusyError>,
}

#[derive(Debug, Deserialize)]
struct FreeBusyError {
    #[serde(default)]
    domain: String,
    #[serde(default)]
    reason: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsertedEvent {
    html_link: String,
}

#[derive(Debug, Deserialize)]
struct Setting {
    value: String,
}

#[derive(Debug, Deserialize)]
struct EventList {
    #[serde(default)]
    items: Vec<Event>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub summary: String,
    pub start: EventTime,
    #[serde(default)]
    pub attendees: Option<Vec<Attendee>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    pub date_time: Option<String>,
    pub date: Option<String>,
}

impl EventTime {
    /// The timed start, or the date of an all-day event.
    pub fn display(&self) -> &str {
        self.date_time
            .as_deref()
            .or(self.date.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub response_status: String,
}

#[derive(Debug, Deserialize)]
struct ColorsResponse {
    #[serde(default)]
    event: HashMap<String, EventColor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventColor {
    pub background: String,
    pub foreground: String,
}

// ── Collaborator ────────────────────────────────────────────────────────────

/// Google Calendar, seen through one session.
pub struct GoogleCalendar<'s> {
    session: &'s GoogleSession,
}

impl<'s> GoogleCalendar<'s> {
    pub fn new(session: &'s GoogleSession) -> Self {
        Self { session }
    }

    /// The calendar's own timezone setting.
    pub fn timezone(&self) -> EngineResult<String> {
        let setting: Setting = fetch(
            self.session.get("/users/me/settings/timezone"),
            "timezone setting",
        )?;
        Ok(setting.value)
    }

    /// Upcoming events on the primary calendar whose text matches `term`.
    pub fn search_events(&self, term: &str, now: DateTime<Utc>) -> EngineResult<Vec<Event>> {
        let until = now + Duration::days(SEARCH_HORIZON_DAYS);
        let list: EventList = fetch(
            self.session.get("/calendars/primary/events").query(&[
                ("q", term.to_string()),
                ("timeMin", now.to_rfc3339()),
                ("timeMax", until.to_rfc3339()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ]),
            "event search",
        )?;
        Ok(list.items)
    }

    /// Event colour palette, ordered by numeric id.
    pub fn event_colors(&self) -> EngineResult<Vec<(String, EventColor)>> {
        let colors: ColorsResponse = fetch(self.session.get("/colors"), "colors")?;
        let mut palette: Vec<_> = colors.event.into_iter().collect();
        palette.sort_by_key(|(id, _)| (id.parse::<u32>().unwrap_or(u32::MAX), id.clone()));
        Ok(palette)
    }
}

impl CalendarRead for GoogleCalendar<'_> {
    fn busy_intervals(
        &self,
        attendees: &[String],
        window: &DayWindow,
    ) -> EngineResult<AttendeeBusyMap> {
        let items: Vec<_> = attendees.iter().map(|id| json!({ "id": id })).collect();
        let body = json!({
            "timeMin": window.start_of_day.to_rfc3339(),
            "timeMax": window.end_of_day.to_rfc3339(),
            "items": items,
        });

        let response: FreeBusyResponse =
            fetch(self.session.post("/freeBusy").json(&body), "free/busy query")?;

        Ok(response
            .calendars
            .into_iter()
            .map(|(id, calendar)| {
                for error in &calendar.errors {
                    warn!(
                        attendee = %id,
                        domain = %error.domain,
                        reason = %error.reason,
                        "calendar unavailable, treating as free"
                    );
                }
                (id, calendar.busy)
            })
            .collect())
    }
}

impl CalendarWrite for GoogleCalendar<'_> {
    fn create_event(&self, request: &BookingRequest) -> EngineResult<CreatedEvent> {
        let attendees: Vec<_> = request
            .attendees
            .iter()
            .map(|email| json!({ "email": email }))
            .collect();
        let body = json!({
            "summary": request.title,
            "description": request.description,
            "start": {
                "dateTime": request.slot.start().to_rfc3339(),
                "timeZone": request.time_zone,
            },
            "end": {
                "dateTime": request.slot.end().to_rfc3339(),
                "timeZone": request.time_zone,
            },
            "attendees": attendees,
            "reminders": { "useDefault": true },
        });

        let event: InsertedEvent = fetch(
            self.session.post("/calendars/primary/events").json(&body),
            "event insert",
        )?;
        Ok(CreatedEvent {
            link: event.html_link,
        })
    }
}
