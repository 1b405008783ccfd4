use super::types::{MSearchResponse, SubResponse};
use crate::aggregations::{process_buckets, trim_datapoints, Props, TableModel, TimeSeries};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::frame::{DataFrame, PreferredVisualisation};
use crate::hits::{hits_to_data_frame, process_hits, DocsSeries, HitsFrameOptions};
use crate::naming::name_series;
use crate::query::{HighlightTags, Target};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// One entry of the output envelope
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ResponseData {
    TimeSeries(TimeSeries),
    Docs(DocsSeries),
    Table(TableModel),
    Frame(DataFrame),
}

/// Output envelope: `{ "data": [...] }`
#[derive(Debug, Clone, Default, Serialize)]
pub struct DataQueryResponse {
    pub data: Vec<ResponseData>,
}

impl DataQueryResponse {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A multi-search response paired with the targets that produced it.
///
/// Sub-responses are matched to targets by position.
pub struct EventResponse {
    targets: Vec<Target>,
    response: MSearchResponse,
    highlight: HighlightTags,
    default_time_field: String,
}

impl EventResponse {
    pub fn new(targets: Vec<Target>, response: MSearchResponse) -> Result<Self> {
        Self::with_config(targets, response, &Config::default())
    }

    pub fn with_config(
        targets: Vec<Target>,
        response: MSearchResponse,
        config: &Config,
    ) -> Result<Self> {
        Ok(Self {
            targets,
            response,
            highlight: HighlightTags::from_config(&config.highlight)?,
            default_time_field: config.logs.time_field.clone(),
        })
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Frames (non-logs) when any target asks for raw data, legacy series
    /// otherwise
    pub fn time_series(&self) -> Result<DataQueryResponse> {
        let raw_data = self.targets.iter().any(|t| t.source_query.has_raw_data());
        if raw_data {
            self.process_response_to_data_frames(false, None, None)
        } else {
            self.process_response_to_series()
        }
    }

    /// Legacy output: docs series, then per target its time series and its
    /// table when it has rows
    pub fn process_response_to_series(&self) -> Result<DataQueryResponse> {
        let mut data = Vec::new();

        for (n, sub) in self.response.responses.iter().enumerate() {
            let target = self.target_for(n, sub)?;

            if let Some(hits) = sub.hits.as_ref().filter(|h| !h.hits.is_empty()) {
                data.push(ResponseData::Docs(process_hits(hits, target)));
            }

            if let Some(aggs) = &sub.aggregations {
                let (series, table) = process_aggregations(aggs, target);
                data.extend(series.into_iter().map(ResponseData::TimeSeries));
                if !table.is_empty() {
                    data.push(ResponseData::Table(table));
                }
            }
        }

        debug!(entries = data.len(), "built series response");
        Ok(DataQueryResponse { data })
    }

    /// Frame output: a hits frame, then per target its table frame and one
    /// frame per time series.
    ///
    /// For logs requests the hits frame prefers the logs view and the
    /// aggregation frames prefer the graph view.
    pub fn process_response_to_data_frames(
        &self,
        is_logs: bool,
        message_field: Option<&str>,
        level_field: Option<&str>,
    ) -> Result<DataQueryResponse> {
        let mut data = Vec::new();

        for (n, sub) in self.response.responses.iter().enumerate() {
            let target = self.target_for(n, sub)?;

            if let Some(hits) = &sub.hits {
                let opts = HitsFrameOptions {
                    time_field: target
                        .time_field
                        .as_deref()
                        .unwrap_or(&self.default_time_field),
                    is_logs,
                    message_field,
                    level_field,
                };
                if let Some(mut frame) = hits_to_data_frame(&hits.hits, &opts, &self.highlight) {
                    if is_logs {
                        frame = frame.with_preferred_visualisation(PreferredVisualisation::Logs);
                    }
                    data.push(ResponseData::Frame(frame.with_ref_id(&target.ref_id)));
                }
            }

            if let Some(aggs) = &sub.aggregations {
                let (series, table) = process_aggregations(aggs, target);

                if !table.is_empty() {
                    data.push(ResponseData::Frame(DataFrame::from_table(&table)));
                }

                for s in &series {
                    let mut frame = DataFrame::from_time_series(s);
                    if is_logs {
                        frame = frame.with_preferred_visualisation(PreferredVisualisation::Graph);
                    }
                    data.push(ResponseData::Frame(frame.with_ref_id(&target.ref_id)));
                }
            }
        }

        debug!(entries = data.len(), is_logs, "built data frame response");
        Ok(DataQueryResponse { data })
    }

    /// Target for the n-th sub-response; engine errors abort here
    fn target_for(&self, n: usize, sub: &SubResponse) -> Result<&Target> {
        if let Some(err) = &sub.error {
            let error = Error::from_engine_error(err);
            warn!(index = n, error = %error, "engine returned an error");
            return Err(error);
        }

        self.targets.get(n).ok_or_else(|| {
            Error::InvalidResponse(format!(
                "sub-response {} has no matching target ({} targets)",
                n,
                self.targets.len()
            ))
        })
    }
}

/// Walk, trim and name one target's aggregations
fn process_aggregations(aggs: &Map<String, Value>, target: &Target) -> (Vec<TimeSeries>, TableModel) {
    let query = &target.source_query;
    let mut series = Vec::new();
    let mut table = TableModel::new();
    table.ref_id = Some(target.ref_id.clone());

    process_buckets(aggs, query, &mut series, &mut table, &Props::Root, 0);
    trim_datapoints(&mut series, query);
    name_series(&mut series, query);

    for s in &mut series {
        s.ref_id = Some(target.ref_id.clone());
    }
    (series, table)
}
