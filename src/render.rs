// ABOUTME: Page rendering collaborator for the authorization endpoint
// ABOUTME: Embedded HTML templates filled from view structs with escaped values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! The authorization endpoint produces view data; a [`PageRenderer`] turns it
//! into markup. Hosts with their own templating replace [`EmbeddedPageRenderer`].

use std::borrow::Cow;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::errors::AppResult;
use crate::host::Locales;
use crate::oauth2_server::models::{AuthorizeFailure, AuthorizePage};

/// Authorization page templates embedded at compile-time
const AUTHORIZE_TEMPLATE: &str = include_str!("../templates/authorize.html");
const AUTHORIZE_FAILURE_TEMPLATE: &str = include_str!("../templates/authorize_failure.html");

/// Renders the authorization endpoint's HTML pages
pub trait PageRenderer: Send + Sync {
    /// Confirmation page shown after a code was issued
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be produced; the endpoint then
    /// rolls back the issued code
    fn render_authorize(&self, view: &AuthorizePage, locales: &Locales) -> AppResult<String>;

    /// Failure page for rejected authorization requests
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be produced
    fn render_failure(&self, view: &AuthorizeFailure, locales: &Locales) -> AppResult<String>;
}

/// Renderer backed by the bundled templates
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedPageRenderer;

impl EmbeddedPageRenderer {
    fn failure_message(view: &AuthorizeFailure) -> &'static str {
        if view.is_missing_params {
            "The request is missing a required parameter."
        } else if view.is_invalid_response_type {
            "The requested response type is not supported."
        } else {
            "The authorization request could not be completed."
        }
    }

    fn scope_list(scopes: &[String]) -> String {
        if scopes.is_empty() {
            return String::new();
        }
        let items: String = scopes
            .iter()
            .map(|scope| format!("<li>{}</li>", encode_text(scope)))
            .collect();
        format!(r#"<ul class="scopes">{items}</ul>"#)
    }
}

/// Substitute `{{NAME}}` placeholders in a single pass
///
/// Substituted values are never scanned again. Unknown placeholders are kept
/// verbatim.
fn fill_template<'a>(
    template: &str,
    value: impl Fn(&str) -> Option<Cow<'a, str>>,
) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 2..];
        let Some(end) = tail.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &tail[..end];
        let filled = value(name).unwrap_or_else(|| Cow::Owned(format!("{{{{{name}}}}}")));
        out.push_str(&filled);
        rest = &tail[end + 2..];
    }
    out.push_str(rest);
    out
}

impl PageRenderer for EmbeddedPageRenderer {
    fn render_authorize(&self, view: &AuthorizePage, locales: &Locales) -> AppResult<String> {
        Ok(fill_template(AUTHORIZE_TEMPLATE, |name| match name {
            "LOCALE" => Some(encode_double_quoted_attribute(&locales.user)),
            "STATE" => Some(encode_double_quoted_attribute(&view.state)),
            "REDIRECT_URL" => Some(Cow::Owned(
                encode_double_quoted_attribute(&view.redirect_url()).into_owned(),
            )),
            "SCOPES" => Some(Cow::Owned(Self::scope_list(&view.scopes))),
            "REDIRECT_URI" => Some(encode_text(&view.redirect_uri)),
            "CLIENT_NAME" => Some(encode_text(&view.client_name)),
            _ => None,
        }))
    }

    fn render_failure(&self, view: &AuthorizeFailure, locales: &Locales) -> AppResult<String> {
        Ok(fill_template(AUTHORIZE_FAILURE_TEMPLATE, |name| match name {
            "LOCALE" => Some(encode_double_quoted_attribute(&locales.user)),
            "REASON" => Some(Cow::Borrowed(view.reason())),
            "MESSAGE" => Some(Cow::Borrowed(Self::failure_message(view))),
            _ => None,
        }))
    }
}
