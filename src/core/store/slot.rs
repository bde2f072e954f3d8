//! Per-key storage cell

/// Value held by a slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SlotValue {
    /// Only the final flag is recorded
    Absent,
    /// Explicit null (allow-null mode)
    Null,
    Text(String),
}

impl SlotValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SlotValue::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_present(&self) -> bool {
        !matches!(self, SlotValue::Absent)
    }

    pub fn from_option(value: Option<&str>) -> Self {
        match value {
            Some(v) => SlotValue::Text(v.to_string()),
            None => SlotValue::Null,
        }
    }
}

/// One key's state
#[derive(Debug, Clone)]
pub(crate) struct Slot {
    pub value: SlotValue,
    pub is_final: bool,
    pub sources: Vec<String>,
    /// Insertion ordinal, stable for the life of the key
    pub order: u64,
    /// Sequence number of the standing `set`, if any
    pub programmatic: Option<u64>,
}

impl Slot {
    pub fn new(value: SlotValue, order: u64) -> Self {
        Self {
            value,
            is_final: false,
            sources: Vec::new(),
            order,
            programmatic: None,
        }
    }

    pub fn to_property(&self, name: &str) -> crate::domain::Property {
        crate::domain::Property {
            name: name.to_string(),
            value: self.value.as_text().map(str::to_string),
            is_final: self.is_final,
            sources: self.sources.clone(),
        }
    }
}
