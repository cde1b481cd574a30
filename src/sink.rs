//! Order sinks.
//!
//! A sink receives closed orders and writes one delivery record per line
//! item. Interpretation never depends on what a sink does with them.

use crate::{Order, OrderKind};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::io::{self, Write};

pub const STATUS_DELIVERED: &str = "Livrée";
pub const STATUS_RETURNED: &str = "Retour";

/// One persisted line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRecord {
    /// `L<yyyymmdd>-<seq>`, one id per recorded order.
    pub delivery_id: String,
    pub recorded_at: NaiveDateTime,
    pub client_id: String,
    pub client_name: String,
    pub product_id: String,
    pub quantity: u32,
    pub status: &'static str,
    #[serde(rename = "type")]
    pub kind: OrderKind,
}

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("failed to write delivery record: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode delivery record: {0}")]
    Encode(#[from] serde_json::Error),
}

pub trait OrderSink {
    /// Record `order` as of `at`; returns the rows written.
    fn record(&mut self, order: &Order, at: NaiveDateTime) -> Result<Vec<DeliveryRecord>, SinkError>;
}

/// Ids are numbered per sink, starting at 1.
#[derive(Debug, Clone, Default)]
struct DeliverySequence {
    next: u32,
}

impl DeliverySequence {
    fn next_id(&mut self, at: NaiveDateTime) -> String {
        self.next += 1;
        format!("L{}-{:03}", at.format("%Y%m%d"), self.next)
    }
}

fn records_for(order: &Order, delivery_id: &str, at: NaiveDateTime) -> Vec<DeliveryRecord> {
    let status = match order.kind {
        OrderKind::Delivery => STATUS_DELIVERED,
        OrderKind::Return => STATUS_RETURNED,
    };
    order
        .items
        .iter()
        .map(|item| DeliveryRecord {
            delivery_id: delivery_id.to_string(),
            recorded_at: at,
            client_id: order.client.id.clone(),
            client_name: order.client.name.clone(),
            product_id: item.product_id.clone(),
            quantity: item.quantity,
            status,
            kind: order.kind,
        })
        .collect()
}

/// Keeps every record in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    sequence: DeliverySequence,
    records: Vec<DeliveryRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[DeliveryRecord] {
        &self.records
    }
}

impl OrderSink for MemorySink {
    fn record(&mut self, order: &Order, at: NaiveDateTime) -> Result<Vec<DeliveryRecord>, SinkError> {
        let id = self.sequence.next_id(at);
        let rows = records_for(order, &id, at);
        self.records.extend(rows.iter().cloned());
        Ok(rows)
    }
}

/// Writes one JSON object per record and line.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    sequence: DeliverySequence,
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        JsonLinesSink { sequence: DeliverySequence::default(), writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OrderSink for JsonLinesSink<W> {
    fn record(&mut self, order: &Order, at: NaiveDateTime) -> Result<Vec<DeliveryRecord>, SinkError> {
        let id = self.sequence.next_id(at);
        let rows = records_for(order, &id, at);
        for row in &rows {
            serde_json::to_writer(&mut self.writer, row)?;
            self.writer.write_all(b"\n")?;
        }
        self.writer.flush()?;
        tracing::debug!(delivery = %id, rows = rows.len(), "recorded order");
        Ok(rows)
    }
}
