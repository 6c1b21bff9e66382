//! Contact form: per-field validation, busy state and the (simulated) send.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::config::ContactFormConfig;
use crate::dom::Page;
use crate::error::UiError;
use crate::markup::escape_html;

pub const FORM_ID: &str = "contactForm";
/// Limit applied to fields without an explicit maximum.
pub const DEFAULT_MAX_LEN: usize = 10_000;
pub const STATUS_CLEAR_MS: u32 = 10_000;
pub const SIMULATED_SEND_MS: u32 = 1_500;

const FIX_ERRORS: &str = "Please fix the errors above";
const SEND_FAILED: &str =
    "Sorry, there was an error sending your message. Please try again or contact me directly.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Element id of the control.
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub max_len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("This field is required")]
    Required,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Maximum {max} characters allowed")]
    TooLong { max: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("transport failed: {0}")]
    Transport(String),
}

/// The four form fields, in display order.
pub fn contact_fields(config: &ContactFormConfig) -> [FieldSpec; 4] {
    let text = |name: &'static str| FieldSpec {
        name,
        kind: FieldKind::Text,
        required: true,
        max_len: DEFAULT_MAX_LEN,
    };
    [
        text("name"),
        FieldSpec {
            kind: FieldKind::Email,
            ..text("email")
        },
        text("subject"),
        FieldSpec {
            max_len: config.max_message_length,
            ..text("message")
        },
    ]
}

pub fn is_valid_email(value: &str) -> bool {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(value))
}

/// Checks a trimmed value. Emptiness wins over format, format over length.
pub fn validate_value(spec: &FieldSpec, raw: &str) -> Result<(), FieldError> {
    let value = raw.trim();
    if value.is_empty() {
        return if spec.required {
            Err(FieldError::Required)
        } else {
            Ok(())
        };
    }
    if spec.kind == FieldKind::Email && !is_valid_email(value) {
        return Err(FieldError::InvalidEmail);
    }
    if value.chars().count() > spec.max_len {
        return Err(FieldError::TooLong { max: spec.max_len });
    }
    Ok(())
}

/// Field values as sent: trimmed and HTML-escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub endpoint: &'static str,
}

impl ContactMessage {
    pub fn confirmation(&self) -> String {
        format!(
            "Thank you, {}! Your message has been sent successfully. I'll get back to you at {} soon.",
            self.name, self.email
        )
    }
}

/// Outbound delivery of a contact message.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, message: &ContactMessage) -> Result<(), SubmitError>;
}

/// Waits a fixed delay and reports success; no request leaves the page.
#[cfg(target_arch = "wasm32")]
pub struct SimulatedTransport;

#[cfg(target_arch = "wasm32")]
impl Transport for SimulatedTransport {
    async fn send(&self, message: &ContactMessage) -> Result<(), SubmitError> {
        log::info!("contact: simulating POST to {}", message.endpoint);
        gloo::timers::future::TimeoutFuture::new(SIMULATED_SEND_MS).await;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

impl StatusKind {
    fn class(self) -> &'static str {
        match self {
            StatusKind::Success => "success",
            StatusKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Invalid,
    Sent,
    Failed,
    /// Refused because another submit was still running.
    Busy,
}

pub struct ContactForm<P: Page, T> {
    page: Rc<P>,
    transport: T,
    form: P::Node,
    fields: Vec<(FieldSpec, P::Node)>,
    status: P::Node,
    endpoint: &'static str,
    single_flight: bool,
    in_flight: Cell<bool>,
    status_generation: Rc<Cell<u64>>,
}

impl<P: Page + 'static, T: Transport> ContactForm<P, T> {
    /// Binds to `#contactForm`, creating its status line when the markup
    /// lacks one. Missing field controls are skipped.
    pub fn attach(page: Rc<P>, transport: T, config: &ContactFormConfig) -> Result<Self, UiError> {
        let form = page
            .element_by_id(FORM_ID)
            .ok_or_else(|| UiError::missing(FORM_ID))?;

        let status = match page.query_within(&form, ".form-status") {
            Some(status) => status,
            None => {
                let status = page.create_element("div")?;
                page.set_class_name(&status, "form-status");
                page.set_attribute(&status, "role", "status");
                page.set_attribute(&status, "aria-live", "polite");
                page.append_child(&form, &status)?;
                status
            }
        };

        let fields = contact_fields(config)
            .into_iter()
            .filter_map(|spec| match page.element_by_id(spec.name) {
                Some(node) => Some((spec, node)),
                None => {
                    log::warn!("contact: no `#{}` control", spec.name);
                    None
                }
            })
            .collect();

        Ok(Self {
            page,
            transport,
            form,
            fields,
            status,
            endpoint: config.endpoint,
            single_flight: config.single_flight,
            in_flight: Cell::new(false),
            status_generation: Rc::new(Cell::new(0)),
        })
    }

    pub fn field_nodes(&self) -> impl Iterator<Item = &P::Node> {
        self.fields.iter().map(|(_, node)| node)
    }

    fn error_slot(&self, node: &P::Node) -> Option<P::Node> {
        let parent = self.page.parent(node)?;
        self.page.query_within(&parent, ".error-message")
    }

    fn find(&self, node: &P::Node) -> Option<&FieldSpec> {
        self.fields.iter().find(|(_, n)| n == node).map(|(spec, _)| spec)
    }

    fn check(&self, spec: &FieldSpec, node: &P::Node) -> Result<(), FieldError> {
        let result = validate_value(spec, &self.page.value(node));
        let slot = self.error_slot(node);
        match &result {
            Err(e) => {
                self.page.add_class(node, "error");
                if let Some(slot) = slot {
                    self.page.set_text(&slot, &e.to_string());
                }
            }
            Ok(()) => {
                self.page.remove_class(node, "error");
                if let Some(slot) = slot {
                    self.page.set_text(&slot, "");
                }
            }
        }
        result
    }

    /// Validates one control and updates its inline error.
    pub fn validate_field(&self, node: &P::Node) -> Result<(), FieldError> {
        match self.find(node) {
            Some(spec) => self.check(spec, node),
            None => Ok(()),
        }
    }

    /// Validates every field so all errors show at once.
    pub fn validate_form(&self) -> bool {
        self.fields
            .iter()
            .fold(true, |valid, (spec, node)| self.check(spec, node).is_ok() && valid)
    }

    /// Editing a field clears its error without re-validating.
    pub fn on_input(&self, node: &P::Node) {
        if self.page.has_class(node, "error") {
            self.page.remove_class(node, "error");
            if let Some(slot) = self.error_slot(node) {
                self.page.set_text(&slot, "");
            }
        }
    }

    fn collect(&self) -> ContactMessage {
        let value = |name: &str| {
            self.fields
                .iter()
                .find(|(spec, _)| spec.name == name)
                .map(|(_, node)| escape_html(self.page.value(node).trim()))
                .unwrap_or_default()
        };
        ContactMessage {
            name: value("name"),
            email: value("email"),
            subject: value("subject"),
            message: value("message"),
            endpoint: self.endpoint,
        }
    }

    fn set_busy(&self, busy: bool) {
        let Some(button) = self.page.query_within(&self.form, ".btn-submit") else {
            return;
        };
        self.page.set_disabled(&button, busy);
        if busy {
            self.page.add_class(&button, "loading");
        } else {
            self.page.remove_class(&button, "loading");
        }
        let text = self.page.query_within(&button, ".btn-text");
        let loader = self.page.query_within(&button, ".btn-loader");
        if let (Some(text), Some(loader)) = (text, loader) {
            if busy {
                self.page.set_attribute(&text, "hidden", "");
                self.page.remove_attribute(&loader, "hidden");
            } else {
                self.page.remove_attribute(&text, "hidden");
                self.page.set_attribute(&loader, "hidden", "");
            }
        }
    }

    /// Shows a status line, cleared after [`STATUS_CLEAR_MS`] unless a newer
    /// one replaced it. `html` must already be escaped.
    pub fn show_status(&self, html: &str, kind: StatusKind) {
        let generation = self.status_generation.get() + 1;
        self.status_generation.set(generation);
        self.page.set_inner_html(&self.status, html);
        self.page
            .set_class_name(&self.status, &format!("form-status {}", kind.class()));

        let page = self.page.clone();
        let status = self.status.clone();
        let current = self.status_generation.clone();
        self.page.set_timeout(
            STATUS_CLEAR_MS,
            Box::new(move || {
                if current.get() == generation {
                    page.set_class_name(&status, "form-status");
                    page.set_inner_html(&status, "");
                }
            }),
        );
    }

    pub async fn submit(&self) -> SubmitOutcome {
        if self.single_flight && self.in_flight.get() {
            log::debug!("contact: submit ignored, one already in flight");
            return SubmitOutcome::Busy;
        }
        if !self.validate_form() {
            self.show_status(FIX_ERRORS, StatusKind::Error);
            return SubmitOutcome::Invalid;
        }

        let message = self.collect();
        self.in_flight.set(true);
        self.set_busy(true);

        let outcome = match self.transport.send(&message).await {
            Ok(()) => {
                self.show_status(&message.confirmation(), StatusKind::Success);
                for (_, node) in &self.fields {
                    self.page.set_value(node, "");
                }
                SubmitOutcome::Sent
            }
            Err(e) => {
                log::error!("contact: submit: {}", e);
                self.show_status(SEND_FAILED, StatusKind::Error);
                SubmitOutcome::Failed
            }
        };

        self.set_busy(false);
        self.in_flight.set(false);
        outcome
    }
}
