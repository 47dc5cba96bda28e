use chrono::NaiveDate;
use serde::Serialize;

/// One broadcast of a slot. A plan cell counting N insertions yields N equal
/// records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InsertionRecord {
    #[serde(rename = "Canal")]
    pub channel: String,
    #[serde(rename = "TV_Show")]
    pub show: String,
    #[serde(rename = "Data")]
    pub date: NaiveDate,
    #[serde(rename = "Horario_inicial")]
    pub start_time: String,
    #[serde(rename = "Horario_final")]
    pub end_time: String,
}
