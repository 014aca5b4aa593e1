//! UK coronavirus dashboard API integration.

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{Metric, MetricSeries};
use crate::error::AppError;

const DEFAULT_BASE_URL: &str = "https://api.coronavirus.data.gov.uk/v2/data";
const URL_ENV_VAR: &str = "COVID_DASHBOARD_URL";

pub struct DashboardClient {
    client: Client,
    base_url: String,
    area_type: String,
    area_name: String,
}

impl DashboardClient {
    /// Build a client for the public dashboard endpoint.
    ///
    /// `COVID_DASHBOARD_URL` (environment or `.env`) overrides the base URL;
    /// without it the public endpoint is used.
    pub fn from_env(area_type: &str, area_name: &str) -> Self {
        dotenvy::dotenv().ok();
        let base_url =
            std::env::var(URL_ENV_VAR).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::with_base_url(base_url, area_type, area_name)
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        area_type: &str,
        area_name: &str,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            area_type: area_type.to_string(),
            area_name: area_name.to_string(),
        }
    }

    /// Fetch one metric's full daily series.
    ///
    /// `Ok(None)` means the dashboard answered with a non-200 status: the
    /// failure is printed with its status code and the caller treats the
    /// metric as absent. Transport and decode failures are returned as errors.
    pub fn fetch_series(&self, metric: Metric) -> Result<Option<MetricSeries>, AppError> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("areaType", self.area_type.as_str()),
                ("areaName", self.area_name.as_str()),
                ("metric", metric.api_field()),
                ("format", "json"),
            ])
            .send()
            .map_err(|e| AppError::new(4, format!("Dashboard request for {metric} failed: {e}")))?;

        let status = resp.status();
        if status != StatusCode::OK {
            eprintln!(
                "Error: unable to fetch {metric} data. Status code: {}",
                status.as_u16()
            );
            return Ok(None);
        }

        let envelope: DataEnvelope = resp.json().map_err(|e| {
            AppError::new(
                4,
                format!("Failed to parse dashboard response for {metric}: {e}"),
            )
        })?;

        Ok(Some(series_from_records(metric, envelope.body)))
    }
}

/// Response envelope: the dashboard wraps the record list in a `body` field.
///
/// Records are kept as raw JSON maps because the value key is named after
/// the requested metric.
#[derive(Debug, Deserialize)]
struct DataEnvelope {
    body: Vec<serde_json::Map<String, Value>>,
}

/// Build a series out of the response's record list.
///
/// Records lacking a usable date or a non-negative integer count are
/// skipped; everything else is kept in response order.
fn series_from_records(
    metric: Metric,
    records: Vec<serde_json::Map<String, Value>>,
) -> MetricSeries {
    let mut points = Vec::with_capacity(records.len());
    for record in records {
        let Some(date) = record.get("date").and_then(Value::as_str) else {
            continue;
        };
        let Some(count) = record.get(metric.api_field()).and_then(Value::as_u64) else {
            continue;
        };
        points.push((date.to_string(), count));
    }
    MetricSeries::new(metric, points)
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;

    use super::*;

    /// Minimal one-shot HTTP server for canned responses.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn series_from_records_extracts_date_and_metric_field() {
        let envelope: DataEnvelope = serde_json::from_str(
            r#"{"body":[
                {"date":"2021-01-01","newCasesBySpecimenDate":10},
                {"date":"2021-01-02","newCasesBySpecimenDate":15}
            ]}"#,
        )
        .unwrap();

        let series = series_from_records(Metric::Cases, envelope.body);
        assert_eq!(
            series.points,
            vec![
                ("2021-01-01".to_string(), 10),
                ("2021-01-02".to_string(), 15)
            ]
        );
    }

    #[test]
    fn series_from_records_skips_unusable_records() {
        let envelope: DataEnvelope = serde_json::from_str(
            r#"{"body":[
                {"date":"2021-01-01","newCasesBySpecimenDate":10},
                {"newCasesBySpecimenDate":5},
                {"date":"2021-01-03","newCasesBySpecimenDate":null},
                {"date":"2021-01-04","newCasesBySpecimenDate":-2},
                {"date":"2021-01-05","newCasesBySpecimenDate":0}
            ]}"#,
        )
        .unwrap();

        let series = series_from_records(Metric::Cases, envelope.body);
        assert_eq!(
            series.points,
            vec![("2021-01-01".to_string(), 10), ("2021-01-05".to_string(), 0)]
        );
    }

    #[test]
    fn fetch_series_maps_response_body() {
        let url = serve_once(
            "200 OK",
            r#"{"body":[{"date":"2021-01-01","newCasesBySpecimenDate":10},{"date":"2021-01-02","newCasesBySpecimenDate":15}]}"#,
        );
        let client = DashboardClient::with_base_url(url, "nation", "England");

        let series = client.fetch_series(Metric::Cases).unwrap().unwrap();
        assert_eq!(
            series.points,
            vec![
                ("2021-01-01".to_string(), 10),
                ("2021-01-02".to_string(), 15)
            ]
        );
    }

    #[test]
    fn fetch_series_treats_not_found_as_absent() {
        let url = serve_once("404 Not Found", r#"{"response":"Not found."}"#);
        let client = DashboardClient::with_base_url(url, "nation", "England");

        let fetched = client.fetch_series(Metric::Deaths).unwrap();
        assert!(fetched.is_none());
    }

    #[test]
    fn fetch_series_surfaces_transport_errors() {
        // Nothing listens on this port.
        let client = DashboardClient::with_base_url("http://127.0.0.1:1", "nation", "England");

        let err = client.fetch_series(Metric::Cases).unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().contains("cases"), "{err}");
    }
}
