//! Column-oriented data frames handed to the dashboard
//!
//! Only what the response builders decide is modelled here: field names,
//! field types, value order and the frame meta tags.

use crate::aggregations::{TableModel, TimeSeries};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Time,
    Number,
    String,
    Other,
}

impl FieldType {
    /// Guess a field type from a sample value
    pub fn guess(value: &Value) -> Self {
        match value {
            Value::Number(_) => FieldType::Number,
            Value::String(_) => FieldType::String,
            _ => FieldType::Other,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filterable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl FieldConfig {
    pub fn filterable() -> Self {
        Self {
            filterable: Some(true),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub config: FieldConfig,
    pub values: Vec<Value>,
    /// Replace missing values with an empty string when rows are added
    #[serde(skip)]
    pub empty_if_missing: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            config: FieldConfig::default(),
            values: Vec::new(),
            empty_if_missing: false,
        }
    }

    pub fn with_config(mut self, config: FieldConfig) -> Self {
        self.config = config;
        self
    }

    pub fn empty_if_missing(mut self) -> Self {
        self.empty_if_missing = true;
        self
    }

    fn push(&mut self, value: Option<&Value>) {
        let value = match value {
            Some(v) if !v.is_null() => v.clone(),
            _ if self.empty_if_missing => Value::String(String::new()),
            _ => Value::Null,
        };
        self.values.push(value);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredVisualisation {
    Graph,
    Table,
    Logs,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_words: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_visualisation_type: Option<PreferredVisualisation>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFrame {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<String>,
    pub fields: Vec<Field>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<FrameMeta>,
}

impl DataFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.first().map(|f| f.values.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append one row, reading each field's value by name
    pub fn add_row(&mut self, row: &Map<String, Value>) {
        for field in &mut self.fields {
            field.push(row.get(&field.name));
        }
    }

    pub fn meta_mut(&mut self) -> &mut FrameMeta {
        self.meta.get_or_insert_with(FrameMeta::default)
    }

    /// Merge words into `meta.searchWords`, keeping first-seen order
    pub fn add_search_words<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = self.meta_mut().search_words.get_or_insert_with(Vec::new);
        for word in words {
            let word = word.into();
            if !list.contains(&word) {
                list.push(word);
            }
        }
    }

    pub fn with_preferred_visualisation(mut self, kind: PreferredVisualisation) -> Self {
        self.meta_mut().preferred_visualisation_type = Some(kind);
        self
    }

    pub fn with_ref_id(mut self, ref_id: impl Into<String>) -> Self {
        self.ref_id = Some(ref_id.into());
        self
    }

    /// Two-field frame (`Time`, `Value`) named after the series
    pub fn from_time_series(series: &TimeSeries) -> Self {
        let mut time = Field::new("Time", FieldType::Time);
        let mut value = Field::new("Value", FieldType::Number);
        for dp in &series.datapoints {
            time.values.push(dp.key.clone());
            value.values.push(dp.value.clone());
        }
        if let Some(name) = &series.target {
            value.config.display_name = Some(name.clone());
        }

        Self {
            name: series.target.clone(),
            ref_id: series.ref_id.clone(),
            fields: vec![time, value],
            meta: None,
        }
    }

    /// One field per table column, typed from its first non-null value
    pub fn from_table(table: &TableModel) -> Self {
        let fields = table
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let values: Vec<Value> = table
                    .rows
                    .iter()
                    .map(|row| row.get(i).cloned().unwrap_or(Value::Null))
                    .collect();
                let field_type = values
                    .iter()
                    .find(|v| !v.is_null())
                    .map(FieldType::guess)
                    .unwrap_or(FieldType::Other);
                let config = if column.filterable {
                    FieldConfig::filterable()
                } else {
                    FieldConfig::default()
                };
                Field {
                    name: column.text.clone(),
                    field_type,
                    config,
                    values,
                    empty_if_missing: false,
                }
            })
            .collect();

        Self {
            name: None,
            ref_id: table.ref_id.clone(),
            fields,
            meta: None,
        }
    }
}
