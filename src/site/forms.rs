//! The site's two forms: the contact form and the footer newsletter box.

use crate::analytics::{AnalyticsTracker, TrackHandle};
use crate::api::{Acknowledgement, ApiClient, ApiError, ContactSubmission};
use futures::future::join_all;
use crate::env;
use tracing::{debug, info};
use url::Url;

/// Event tracked after the contact form is submitted
pub const CONTACT_SUBMIT_EVENT: &str = "contact_form_submit";

/// Event tracked after a successful newsletter subscription
pub const NEWSLETTER_SIGNUP_EVENT: &str = "newsletter_signup";

pub const NEWSLETTER_SUCCESS_MESSAGE: &str = "Successfully subscribed to newsletter!";

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("Please fill in all fields (missing: {})", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("Invalid mail compose link: {0}")]
    InvalidLink(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Contact form state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            subject: subject.into(),
            message: message.into(),
        }
    }

    /// Names of the fields left blank, in form order
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("subject", &self.subject),
            ("message", &self.message),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    pub fn validate(&self) -> Result<ContactSubmission, FormError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(FormError::MissingFields(missing));
        }

        Ok(ContactSubmission {
            name: self.name.clone(),
            email: self.email.clone(),
            subject: self.subject.clone(),
            message: self.message.clone(),
        })
    }

    /// Plain-text body used by the mail compose link
    pub fn email_body(&self) -> String {
        format!(
            "Hello NULLBOTS Team,\n\n\
             Name: {}\n\
             Email: {}\n\
             Subject: {}\n\n\
             Message:\n{}\n\n\
             ---\n\
             This message was sent from the NULLBOTS contact form.",
            self.name, self.email, self.subject, self.message
        )
        .trim()
        .to_string()
    }

    /// Pre-filled web mail compose link addressed to the studio
    pub fn compose_link(&self) -> Result<Url, FormError> {
        let mut url = Url::parse(env::studio::MAIL_COMPOSE_URL)
            .map_err(|e| FormError::InvalidLink(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("view", "cm")
            .append_pair("fs", "1")
            .append_pair("to", env::studio::CONTACT_EMAIL)
            .append_pair("su", &self.subject)
            .append_pair("body", &self.email_body());
        Ok(url)
    }

    /// Validate, build the compose link and track the submission.
    ///
    /// Nothing is sent to the backend; the caller opens the link.
    pub fn submit_via_mail(
        &self,
        tracker: &AnalyticsTracker,
    ) -> Result<(Url, TrackHandle), FormError> {
        self.validate()?;
        let link = self.compose_link()?;
        debug!("Built compose link for contact from {}", self.email);
        Ok((link, tracker.track_event(CONTACT_SUBMIT_EVENT, None)))
    }

    /// Validate and post the form to the backend, tracking it on success
    pub async fn submit_via_api(
        &self,
        tracker: &AnalyticsTracker,
    ) -> Result<(Acknowledgement, TrackHandle), FormError> {
        let submission = self.validate()?;
        let ack = tracker.client().contact().submit(&submission).await?;
        info!("Contact form submitted for {}", submission.email);
        Ok((ack, tracker.track_event(CONTACT_SUBMIT_EVENT, None)))
    }
}

/// What the newsletter box shows after a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupOutcome {
    pub subscribed: bool,
    pub message: String,
}

/// Footer newsletter box
#[derive(Debug, Clone, Copy, Default)]
pub struct NewsletterSignup;

impl NewsletterSignup {
    /// Mount the footer on `page`, submit `email` and wait until the page
    /// view and the signup event were delivered
    pub async fn submit_on_page(client: ApiClient, page: &str, email: &str) -> SignupOutcome {
        let (tracker, mounted) = AnalyticsTracker::mount(client, page);
        let (outcome, tracking) = Self::submit(&tracker, email).await;

        let mut pending = vec![mounted];
        pending.extend(tracking);
        join_all(pending).await;
        outcome
    }

    /// Subscribe `email`; failures become the message shown to the visitor.
    ///
    /// A successful subscription also returns the handle of the
    /// `newsletter_signup` event.
    pub async fn submit(
        tracker: &AnalyticsTracker,
        email: &str,
    ) -> (SignupOutcome, Option<TrackHandle>) {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            let outcome = SignupOutcome {
                subscribed: false,
                message: "Please enter a valid email address".to_string(),
            };
            return (outcome, None);
        }

        match tracker.client().newsletter().subscribe(email).await {
            Ok(_) => {
                info!("Subscribed {} to the newsletter", email);
                let outcome = SignupOutcome {
                    subscribed: true,
                    message: NEWSLETTER_SUCCESS_MESSAGE.to_string(),
                };
                (outcome, Some(tracker.track_event(NEWSLETTER_SIGNUP_EVENT, None)))
            }
            Err(e) => {
                debug!("Newsletter subscription failed: {}", e);
                let outcome = SignupOutcome {
                    subscribed: false,
                    message: e.message().to_string(),
                };
                (outcome, None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ClientConfig, HttpMethod, HttpResponse, RecordingTransport};
    use crate::session::SessionIdentity;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn tracker_with(transport: Arc<RecordingTransport>) -> AnalyticsTracker {
        let config = ClientConfig::default().with_base_url(env::test::TEST_API_BASE_URL);
        let client = ApiClient::new(&config, transport, SessionIdentity::in_memory()).unwrap();
        AnalyticsTracker::mount(client, "/contact").0
    }

    /// Wait until `count` analytics events were recorded
    async fn wait_for_events(transport: &RecordingTransport, count: usize) -> Vec<serde_json::Value> {
        for _ in 0..100 {
            let events: Vec<_> = transport
                .requests_to("/analytics/track")
                .await
                .into_iter()
                .filter_map(|r| r.body)
                .collect();
            if events.len() >= count {
                return events;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("expected {} analytics events", count);
    }

    fn filled_form() -> ContactForm {
        ContactForm::new("Ada", "ada@example.com", "New site", "Hi there")
    }

    #[test]
    fn test_missing_fields() {
        let form = ContactForm::new("Ada", "  ", "", "Hi");
        assert_eq!(form.missing_fields(), vec!["email", "subject"]);

        let err = form.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Please fill in all fields (missing: email, subject)"
        );
        assert!(filled_form().validate().is_ok());
    }

    #[test]
    fn test_email_body() {
        let body = filled_form().email_body();
        assert!(body.starts_with("Hello NULLBOTS Team,\n\nName: Ada\nEmail: ada@example.com"));
        assert!(body.contains("Message:\nHi there\n\n---\n"));
        assert!(body.ends_with("This message was sent from the NULLBOTS contact form."));
    }

    #[test]
    fn test_compose_link() {
        let link = filled_form().compose_link().unwrap();

        assert_eq!(link.host_str(), Some("mail.google.com"));
        let pairs: Vec<(String, String)> = link.query_pairs().into_owned().collect();
        assert_eq!(pairs[0], ("view".to_string(), "cm".to_string()));
        assert_eq!(pairs[1], ("fs".to_string(), "1".to_string()));
        assert_eq!(
            pairs[2],
            ("to".to_string(), env::studio::CONTACT_EMAIL.to_string())
        );
        assert_eq!(pairs[3], ("su".to_string(), "New site".to_string()));
        assert_eq!(pairs[4].1, filled_form().email_body());
    }

    #[tokio::test]
    async fn test_submit_via_mail_tracks_event() {
        let transport = Arc::new(RecordingTransport::new());
        let tracker = tracker_with(transport.clone());

        let (link, _tracking) = filled_form().submit_via_mail(&tracker).unwrap();
        assert!(link.as_str().starts_with(env::studio::MAIL_COMPOSE_URL));

        let events = wait_for_events(&transport, 2).await;
        assert!(events.iter().any(|e| e["event"] == CONTACT_SUBMIT_EVENT
            && e["page"] == "/contact"));
        assert!(transport.requests_to("/contact/submit").await.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_form_sends_nothing() {
        let transport = Arc::new(RecordingTransport::new());
        let tracker = tracker_with(transport.clone());
        // Only the mount page view
        wait_for_events(&transport, 1).await;

        let form = ContactForm::new("Ada", "", "", "");
        assert!(matches!(
            form.submit_via_api(&tracker).await,
            Err(FormError::MissingFields(_))
        ));
        assert!(form.submit_via_mail(&tracker).is_err());

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(transport.requests().await.len(), 1);
    }

    #[tokio::test]
    async fn test_submit_via_api_error_is_not_tracked() {
        let transport = Arc::new(RecordingTransport::new().with_response(
            HttpMethod::Post,
            "/contact/submit",
            HttpResponse::json(400, json!({"message": "bad email"})),
        ));
        let tracker = tracker_with(transport.clone());
        wait_for_events(&transport, 1).await;

        let err = filled_form().submit_via_api(&tracker).await.unwrap_err();
        assert_eq!(err.to_string(), "bad email");

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(transport.requests_to("/analytics/track").await.len(), 1);
    }

    #[tokio::test]
    async fn test_newsletter_signup_success() {
        let transport = Arc::new(RecordingTransport::new());
        let tracker = tracker_with(transport.clone());

        let (outcome, tracking) = NewsletterSignup::submit(&tracker, " reader@example.com ").await;
        tracking.expect("signup is tracked").await.unwrap();
        assert_eq!(
            outcome,
            SignupOutcome {
                subscribed: true,
                message: NEWSLETTER_SUCCESS_MESSAGE.to_string()
            }
        );

        let events = wait_for_events(&transport, 2).await;
        assert!(events.iter().any(|e| e["event"] == NEWSLETTER_SIGNUP_EVENT));
        let subscribe = transport.requests_to("/newsletter/subscribe").await;
        assert_eq!(subscribe[0].body, Some(json!({"email": "reader@example.com"})));
    }

    #[tokio::test]
    async fn test_newsletter_signup_failure_message() {
        let transport = Arc::new(RecordingTransport::new().with_response(
            HttpMethod::Post,
            "/newsletter/subscribe",
            HttpResponse::json(409, json!({"message": "Email already subscribed"})),
        ));
        let tracker = tracker_with(transport.clone());

        let (outcome, tracking) = NewsletterSignup::submit(&tracker, "reader@example.com").await;
        assert!(!outcome.subscribed);
        assert!(tracking.is_none());
        assert_eq!(outcome.message, "Email already subscribed");

        let (outcome, tracking) = NewsletterSignup::submit(&tracker, "not-an-email").await;
        assert!(!outcome.subscribed);
        assert!(tracking.is_none());
        assert_eq!(transport.requests_to("/newsletter/subscribe").await.len(), 1);
    }

    #[tokio::test]
    async fn test_newsletter_submit_on_page_delivers_signup_event() {
        let transport = Arc::new(RecordingTransport::new());
        let config = ClientConfig::default().with_base_url(env::test::TEST_API_BASE_URL);
        let client = ApiClient::new(&config, transport.clone(), SessionIdentity::in_memory()).unwrap();

        let outcome = NewsletterSignup::submit_on_page(client, "/", "reader@example.com").await;
        assert!(outcome.subscribed);

        // Everything is delivered once the call returns
        let events: Vec<_> = transport
            .requests_to("/analytics/track")
            .await
            .into_iter()
            .filter_map(|r| r.body)
            .collect();
        assert_eq!(events.len(), 2);
        assert!(events.iter().any(|e| e["event"] == "page_view" && e["page"] == "/"));
        assert!(events
            .iter()
            .any(|e| e["event"] == NEWSLETTER_SIGNUP_EVENT && e["page"] == "/"));
        assert_eq!(transport.requests_to("/newsletter/subscribe").await.len(), 1);
    }

    #[tokio::test]
    async fn test_newsletter_submit_on_page_failure_skips_signup_event() {
        let transport = Arc::new(RecordingTransport::new().with_response(
            HttpMethod::Post,
            "/newsletter/subscribe",
            HttpResponse::new(500, "oops"),
        ));
        let config = ClientConfig::default().with_base_url(env::test::TEST_API_BASE_URL);
        let client = ApiClient::new(&config, transport.clone(), SessionIdentity::in_memory()).unwrap();

        let outcome = NewsletterSignup::submit_on_page(client, "/", "reader@example.com").await;
        assert!(!outcome.subscribed);
        assert_eq!(outcome.message, "Failed to subscribe");
        assert_eq!(transport.requests_to("/analytics/track").await.len(), 1);
    }
}
