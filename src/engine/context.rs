//! Parsing context and order assembly.
//!
//! `Context` is the state carried from one line to the next within a single
//! message. `OrderAssembler` owns it and enforces the two order invariants:
//!
//! - **close-before-open**: the open order is flushed before a new one's
//!   context is installed;
//! - an order is emitted only with a client and at least one item.

use crate::{Client, Delta, Format, LineItem, Opening, Order, OrderKind};

/// Where the current format came from. An explicit keyword disables the
/// double-line lookahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormatSource {
    ClientDefault,
    Keyword,
}

#[derive(Debug, Clone)]
pub(crate) struct Context {
    pub client: Option<Client>,
    pub format: Format,
    pub format_source: FormatSource,
    pub frozen: bool,
    pub kind: OrderKind,
    pub items: Vec<LineItem>,
}

impl Context {
    pub fn empty() -> Self {
        Context {
            client: None,
            format: Format::L1,
            format_source: FormatSource::ClientDefault,
            frozen: false,
            kind: OrderKind::Delivery,
            items: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct OrderAssembler {
    context: Context,
    orders: Vec<Order>,
}

impl OrderAssembler {
    pub fn new() -> Self {
        OrderAssembler { context: Context::empty(), orders: Vec::new() }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Emit the open order if it has a client and items, then clear the
    /// accumulated items. Nothing else in the context changes.
    pub fn flush(&mut self) {
        let items = std::mem::take(&mut self.context.items);
        if items.is_empty() {
            return;
        }
        let Some(client) = self.context.client.clone() else {
            tracing::warn!(dropped = items.len(), "items accumulated without a client, discarding");
            return;
        };

        tracing::debug!(client = %client.id, kind = ?self.context.kind, items = items.len(), "closing order");
        self.orders.push(Order { client, items, kind: self.context.kind });
    }

    /// Close the open order and reset the context for the new one.
    pub fn open(&mut self, opening: Opening) {
        self.flush();

        let format = opening.client.as_ref().map(Client::opening_format).unwrap_or(Format::L1);
        self.context = Context {
            client: opening.client,
            format,
            format_source: FormatSource::ClientDefault,
            frozen: false,
            kind: opening.kind,
            items: Vec::new(),
        };
    }

    /// Apply a context delta; returns the number of items added.
    pub fn apply(&mut self, delta: Delta) -> usize {
        if let Some(format) = delta.format {
            self.context.format = format;
            self.context.format_source = FormatSource::Keyword;
        }
        if let Some(frozen) = delta.frozen {
            self.context.frozen = frozen;
        }
        let added = delta.items.len();
        self.context.items.extend(delta.items);
        added
    }

    /// Final flush; returns every order in the order it was closed.
    pub fn finish(mut self) -> Vec<Order> {
        self.flush();
        self.orders
    }
}
