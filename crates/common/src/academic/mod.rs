//! Client for the bibliographic knowledge-graph service
//!
//! Two endpoints under one base URL:
//! - `interpret` turns free text into structured query expressions
//! - `evaluate` resolves a structured expression into entity records
//!
//! Both take URL-encoded forms and authenticate through a
//! subscription-key header. A successful HTTP response may still carry
//! an explicit `Error` field in the body; that case surfaces as a typed
//! service fault instead of data.

use crate::config::AcademicConfig;
use crate::errors::{AppError, Result};
use crate::metrics;
use serde::Deserialize;
use serde_json::Value;
use std::time::Instant;

/// Header carrying the subscription key
const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// HTTP client for the interpret/evaluate endpoints
#[derive(Debug, Clone)]
pub struct AcademicClient {
    http: reqwest::Client,
    base_url: String,
    subscription_key: Option<String>,
    model: String,
    interpret_count: u32,
    attributes: String,
}

impl AcademicClient {
    /// Create a client from configuration
    pub fn new(config: &AcademicConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(AppError::Transport)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            subscription_key: config.subscription_key.clone(),
            model: config.model.clone(),
            interpret_count: config.interpret_count,
            attributes: config.attributes.clone(),
        })
    }

    /// Interpret a free-text query into structured expressions
    pub async fn interpret(&self, query: &str) -> Result<InterpretResponse> {
        let count = self.interpret_count.to_string();
        let params = [
            ("model", self.model.as_str()),
            ("count", count.as_str()),
            ("offset", "0"),
            ("query", query),
        ];

        let value = self.post_form("interpret", &params).await?;
        let response = serde_json::from_value(value)?;
        Ok(response)
    }

    /// Evaluate a structured expression into entity records
    pub async fn evaluate(&self, expr: &str, count: u32) -> Result<EvaluateResponse> {
        let count = count.to_string();
        let params = [
            ("model", self.model.as_str()),
            ("count", count.as_str()),
            ("offset", "0"),
            ("orderby", ""),
            ("attributes", self.attributes.as_str()),
            ("expr", expr),
        ];

        let value = self.post_form("evaluate", &params).await?;
        let response = serde_json::from_value(value)?;
        Ok(response)
    }

    /// POST a form to an endpoint and return the parsed JSON body
    async fn post_form(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let start = Instant::now();

        let mut request = self.http.post(&url).form(params);
        if let Some(key) = &self.subscription_key {
            request = request.header(SUBSCRIPTION_KEY_HEADER, key);
        }

        let result = self.request_json(request).await;
        metrics::record_upstream(endpoint, start.elapsed().as_secs_f64(), result.is_ok());

        if let Err(e) = &result {
            tracing::warn!(endpoint, error = %e, "Knowledge-graph request failed");
        }
        result
    }

    async fn request_json(&self, request: reqwest::RequestBuilder) -> Result<Value> {
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream {
                status: status.as_u16(),
                message: body,
            });
        }

        let value: Value = response.json().await?;

        // A 200 body can still carry an explicit error field.
        if let Some(fault) = value.get("Error") {
            return Err(AppError::ServiceFault {
                message: fault.to_string(),
            });
        }

        Ok(value)
    }
}

/// Response of the interpret endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct InterpretResponse {
    /// Echo of the submitted query
    pub query: Option<String>,

    /// Interpretation candidates, most likely first.
    /// Absent when the service found no reading of the query.
    pub interpretations: Option<Vec<Interpretation>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Interpretation {
    pub logprob: Option<f64>,

    #[serde(default)]
    pub rules: Vec<InterpretationRule>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InterpretationRule {
    pub name: Option<String>,
    pub output: RuleOutput,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuleOutput {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl InterpretResponse {
    /// Select the structured expression to evaluate: the first
    /// interpretation whose leading rule outputs a query. `None` means
    /// the pipeline has no usable expression and must terminate empty.
    pub fn expression(&self) -> Option<&str> {
        self.interpretations
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find_map(|interpretation| {
                interpretation
                    .rules
                    .first()
                    .filter(|rule| rule.output.kind == "query")
                    .map(|rule| rule.output.value.as_str())
            })
    }
}

/// Response of the evaluate endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluateResponse {
    /// Echo of the evaluated expression
    pub expr: Option<String>,

    /// Entity records; absent when the expression matched nothing
    pub entities: Option<Vec<PaperEntity>>,
}

/// Raw paper record as returned by the evaluator. Every field beyond
/// the id is optional; the completeness filter decides what survives.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaperEntity {
    #[serde(rename = "Id")]
    pub id: Option<i64>,

    #[serde(rename = "DN")]
    pub title: Option<String>,

    #[serde(rename = "Y")]
    pub year: Option<i32>,

    #[serde(rename = "CC")]
    pub citation_count: Option<u64>,

    #[serde(rename = "J")]
    pub journal: Option<Journal>,

    #[serde(rename = "AA")]
    pub authors: Option<Vec<AuthorEntity>>,

    #[serde(rename = "RId")]
    pub references: Option<Vec<i64>>,

    #[serde(rename = "DOI")]
    pub doi: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Journal {
    #[serde(rename = "JN")]
    pub name: Option<String>,
}

/// Author record. The service exposes two name attributes depending on
/// the projection (normalized `AuN` vs display `DAuN`); both are
/// modeled so one response type serves either profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorEntity {
    #[serde(rename = "AuId")]
    pub id: Option<i64>,

    #[serde(rename = "DAuN")]
    pub display_name: Option<String>,

    #[serde(rename = "AuN")]
    pub normalized_name: Option<String>,

    #[serde(rename = "DAfN")]
    pub affiliation: Option<String>,
}

impl AuthorEntity {
    /// Preferred display name, falling back to the normalized form
    pub fn name(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .or(self.normalized_name.as_deref())
    }
}
