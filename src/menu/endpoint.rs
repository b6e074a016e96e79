//! Endpoint contract and caption/language mutators

use super::navigation::Transition;
use super::{Menu, MenuError, NodeId};
use crate::platform::Callback;
use crate::session::Session;
use async_trait::async_trait;
use std::fmt::{self, Write as _};
use std::sync::Arc;

/// What the menu should do after an endpoint ran
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum Directive {
    Back = -1,
    Stay = 0,
    Forward = 1,
}

/// Application code bound to a menu option
#[async_trait]
pub trait Endpoint: Send + Sync {
    async fn handle(&self, cx: &mut EndpointContext<'_>) -> Directive;
}

/// Endpoint backed by a synchronous closure
pub struct FnEndpoint<F>(F);

#[async_trait]
impl<F> Endpoint for FnEndpoint<F>
where
    F: Fn(&mut EndpointContext<'_>) -> Directive + Send + Sync,
{
    async fn handle(&self, cx: &mut EndpointContext<'_>) -> Directive {
        (self.0)(cx)
    }
}

/// Wrap a closure as an endpoint
pub fn endpoint_fn<F>(f: F) -> Arc<dyn Endpoint>
where
    F: Fn(&mut EndpointContext<'_>) -> Directive + Send + Sync + 'static,
{
    Arc::new(FnEndpoint(f))
}

/// What an endpoint sees of the event it is handling
pub struct EndpointContext<'a> {
    menu: &'a Menu,
    node: NodeId,
    callback: &'a Callback,
    session: &'a mut Session,
}

impl<'a> EndpointContext<'a> {
    pub(crate) fn new(
        menu: &'a Menu,
        node: NodeId,
        callback: &'a Callback,
        session: &'a mut Session,
    ) -> Self {
        Self {
            menu,
            node,
            callback,
            session,
        }
    }

    pub fn menu(&self) -> &'a Menu {
        self.menu
    }

    /// Node whose option was pressed
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn callback(&self) -> &Callback {
        self.callback
    }

    pub fn session(&self) -> &Session {
        &*self.session
    }

    pub fn language(&self) -> &str {
        &self.session.locale
    }

    /// Change the displayed text. The screen is updated by the next
    /// navigation step, not here.
    pub fn set_caption(&mut self, text: impl Into<String>) -> &mut Self {
        if self.session.set_caption(self.node, text.into()) {
            tracing::debug!(user = %self.session.user, node = %self.node, "Caption changed");
        }
        self
    }

    /// Like [`set_caption`](Self::set_caption), filling `{}` placeholders
    /// from `args` in order
    pub fn set_caption_fmt(&mut self, template: &str, args: &[&dyn fmt::Display]) -> &mut Self {
        let text = format_caption(template, args);
        self.set_caption(text)
    }

    /// Switch the session locale and redraw the current screen in it
    pub async fn set_language(
        &mut self,
        locale: impl Into<String>,
    ) -> Result<Transition, MenuError> {
        self.session.locale = locale.into();
        self.session.mark_dirty(self.node);
        tracing::info!(
            user = %self.session.user,
            locale = %self.session.locale,
            "Language switched"
        );
        self.menu.next(self.node, self.session).await
    }
}

pub(crate) fn format_caption(template: &str, args: &[&dyn fmt::Display]) -> String {
    if args.is_empty() {
        return template.to_string();
    }
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut pieces = template.split("{}").peekable();
    while let Some(piece) = pieces.next() {
        out.push_str(piece);
        if pieces.peek().is_none() {
            break;
        }
        match args.next() {
            Some(arg) => {
                let _ = write!(out, "{arg}");
            }
            None => out.push_str("{}"),
        }
    }
    out
}
