//! Student request submissions
//!
//! Each submission reports back to the student through the notification store: a
//! success or failure notification is added whatever the outcome.

use crate::core::api::{ApiClient, ApiError};
use crate::core::models::{Notification, NotificationKind};
use crate::core::notifications::NotificationStore;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fewest credits in a term that need no approval
pub const MIN_NORMAL_CREDITS: u32 = 11;
/// Most credits in a term that need no approval
pub const MAX_NORMAL_CREDITS: u32 = 20;
/// Most hours per week a co-op may ask for
pub const MAX_COOP_HOURS: u32 = 40;

/// Errors raised while submitting a request
#[derive(Debug, Error)]
pub enum RequestError {
    /// A required field is blank
    #[error("{0} is required")]
    MissingField(&'static str),
    /// The co-op ends on or before its start
    #[error("end date {end} must be after start date {start}")]
    InvalidDates {
        /// First day
        start: NaiveDate,
        /// Last day
        end: NaiveDate,
    },
    /// Weekly hours outside 1..=40
    #[error("hours per week must be between 1 and 40, got {0}")]
    InvalidHours(u32),
    /// Negative or non-finite pay
    #[error("hourly rate must be zero or more")]
    InvalidRate,
    /// A credit load inside the normal band
    #[error("{0} credits is a normal load and needs no approval")]
    NoApprovalNeeded(u32),
    /// Nobody is signed in to receive the request
    #[error("nobody is signed in")]
    NotSignedIn,
    /// The backend refused or could not be reached
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Co-op placement submitted for advisor review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoopRequest {
    /// Employer
    pub company: String,
    /// Job title
    pub position: String,
    /// First day of work
    pub start_date: NaiveDate,
    /// Last day of work
    pub end_date: NaiveDate,
    /// Pay per hour
    pub hourly_rate: f64,
    /// Hours per week
    pub hours_per_week: u32,
    /// Free-form description
    #[serde(default)]
    pub description: String,
}

/// Pay estimate for a co-op
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Earnings {
    /// Started weeks between start and end
    pub weeks: i64,
    /// Pay per week
    pub weekly: f64,
    /// Pay for the whole placement
    pub total: f64,
}

impl CoopRequest {
    /// Check the form rules
    ///
    /// # Errors
    /// Returns the first rule that fails.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.company.trim().is_empty() {
            return Err(RequestError::MissingField("company"));
        }
        if self.position.trim().is_empty() {
            return Err(RequestError::MissingField("position"));
        }
        if self.end_date <= self.start_date {
            return Err(RequestError::InvalidDates {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if !(1..=MAX_COOP_HOURS).contains(&self.hours_per_week) {
            return Err(RequestError::InvalidHours(self.hours_per_week));
        }
        if !self.hourly_rate.is_finite() || self.hourly_rate < 0.0 {
            return Err(RequestError::InvalidRate);
        }
        Ok(())
    }

    /// Estimated pay; a partial week counts as a full one
    #[must_use]
    pub fn earnings(&self) -> Earnings {
        let days = (self.end_date - self.start_date).num_days().max(0);
        let weeks = (days + 6) / 7;
        let weekly = self.hourly_rate * f64::from(self.hours_per_week);
        #[allow(clippy::cast_precision_loss)]
        let total = weekly * weeks as f64;
        Earnings {
            weeks,
            weekly,
            total,
        }
    }
}

/// Submit a co-op request, forwarding it to the backend when a client is given
///
/// Returns the success notification added for the student.
///
/// # Errors
/// Returns an error when nobody is signed in, the request is invalid or the backend
/// rejects it. Every failure after the sign-in check adds a "Submission Failed"
/// notification.
pub fn submit_coop_request(
    store: &NotificationStore,
    request: &CoopRequest,
    client: Option<&ApiClient>,
) -> Result<Notification, RequestError> {
    if store.current_user().is_none() {
        return Err(RequestError::NotSignedIn);
    }

    let sent = request.validate().and_then(|()| match client {
        Some(client) => client.submit_coop_request(request).map_err(RequestError::from),
        None => Ok(()),
    });
    if let Err(e) = sent {
        crate::error!("Error submitting co-op request: {e}");
        store.add_notification(
            "Submission Failed",
            "Unable to submit co-op request. Please try again or contact your advisor.",
            NotificationKind::Error,
            Some("coop"),
        );
        return Err(e);
    }

    store
        .add_notification(
            "Co-op Request Submitted!",
            &format!(
                "Your co-op request for {} at {} has been submitted for review.",
                request.position, request.company
            ),
            NotificationKind::Success,
            Some("coop"),
        )
        .ok_or(RequestError::NotSignedIn)
}

/// Request to take more or fewer credits than a normal term allows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditLoadRequest {
    /// Term name, e.g. "Spring 2026"
    pub term: String,
    /// Requested credits
    pub credits: u32,
}

impl CreditLoadRequest {
    /// Whether this load needs faculty approval
    #[must_use]
    pub const fn requires_approval(&self) -> bool {
        self.credits < MIN_NORMAL_CREDITS || self.credits > MAX_NORMAL_CREDITS
    }

    fn direction(&self) -> &'static str {
        if self.credits > MAX_NORMAL_CREDITS {
            "overload"
        } else {
            "underload"
        }
    }
}

/// Submit a credit-load request for faculty review
///
/// # Errors
/// Returns an error when nobody is signed in, the term is blank or the load needs no
/// approval.
pub fn submit_credit_load_request(
    store: &NotificationStore,
    request: &CreditLoadRequest,
) -> Result<Notification, RequestError> {
    if request.term.trim().is_empty() {
        return Err(RequestError::MissingField("term"));
    }
    if !request.requires_approval() {
        return Err(RequestError::NoApprovalNeeded(request.credits));
    }
    store
        .add_notification(
            "Credit load request submitted",
            &format!(
                "Requested {} credits for {} ({}). Waiting for faculty review.",
                request.credits,
                request.term.trim(),
                request.direction()
            ),
            NotificationKind::CreditLoadRequest,
            Some("credits"),
        )
        .ok_or(RequestError::NotSignedIn)
}
