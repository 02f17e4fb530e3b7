use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use super::rows::{NewProjectRow, ProjectRow, StatusPatch};
use super::{RecordService, RemoteError, Result};
use crate::domain::Status;
use crate::settings::RemoteConfig;

const TABLE_PATH: &str = "/rest/v1/projects";

/// PostgREST client for the `projects` table of a Supabase project.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    client: Client,
    table_url: Url,
    apikey: HeaderValue,
    bearer: HeaderValue,
}

impl SupabaseClient {
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let table_url = config
            .url
            .join(TABLE_PATH)
            .map_err(|e| RemoteError::InvalidConfig(format!("Invalid table URL: {e}")))?;

        let mut apikey = HeaderValue::from_str(&config.anon_key)
            .map_err(|_| RemoteError::InvalidConfig("anon key is not a valid header".into()))?;
        apikey.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.anon_key))
            .map_err(|_| RemoteError::InvalidConfig("anon key is not a valid header".into()))?;
        bearer.set_sensitive(true);

        let client = Client::builder()
            .build()
            .map_err(|e| RemoteError::InvalidConfig(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            table_url,
            apikey,
            bearer,
        })
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.client
            .request(method, self.table_url.clone())
            .header("apikey", self.apikey.clone())
            .header(AUTHORIZATION, self.bearer.clone())
    }

    fn by_id(&self, method: Method, id: &str) -> RequestBuilder {
        self.request(method).query(&[("id", format!("eq.{id}"))])
    }

    fn fetch_all_request(&self) -> RequestBuilder {
        self.request(Method::GET)
            .query(&[("select", "*"), ("order", "created_at.desc")])
    }

    fn insert_request(&self, row: &NewProjectRow) -> RequestBuilder {
        self.request(Method::POST)
            .query(&[("select", "*")])
            .header("Prefer", "return=representation")
            .json(std::slice::from_ref(row))
    }

    fn update_request(&self, id: &str, row: &NewProjectRow) -> RequestBuilder {
        self.by_id(Method::PATCH, id).json(row)
    }

    fn update_status_request(&self, id: &str, status: Status) -> RequestBuilder {
        self.by_id(Method::PATCH, id).json(&StatusPatch { status })
    }

    fn delete_request(&self, id: &str) -> RequestBuilder {
        self.by_id(Method::DELETE, id)
    }

    async fn send(&self, request: RequestBuilder, call_name: &str) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::Transport(format!("Failed to call {call_name}: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(error_for_status(status, body))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        call_name: &str,
    ) -> Result<T> {
        let response = self.send(request, call_name).await?;
        response.json::<T>().await.map_err(|e| {
            RemoteError::Parsing(format!("Failed to parse {call_name} response: {e}"))
        })
    }

    async fn send_without_body(&self, request: RequestBuilder, call_name: &str) -> Result<()> {
        let response = self.send(request, call_name).await?;
        let _ = response.bytes().await;
        Ok(())
    }
}

/// Maps a non-success response to an error. Rejected credentials are
/// reported separately from other failures.
fn error_for_status(status: StatusCode, body: String) -> RemoteError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RemoteError::Unauthorized,
        _ => RemoteError::Status {
            status: status.as_u16(),
            body,
        },
    }
}

fn only_row(rows: Vec<ProjectRow>) -> Result<ProjectRow> {
    let count = rows.len();
    let mut rows = rows.into_iter();
    match (rows.next(), rows.next()) {
        (Some(row), None) => Ok(row),
        _ => Err(RemoteError::UnexpectedRowCount(count)),
    }
}

#[async_trait]
impl RecordService for SupabaseClient {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn fetch_all(&self) -> Result<Vec<ProjectRow>> {
        self.get_json(self.fetch_all_request(), "GET projects").await
    }

    #[tracing::instrument(level = "debug", skip(self, row))]
    async fn insert(&self, row: &NewProjectRow) -> Result<ProjectRow> {
        let rows: Vec<ProjectRow> = self
            .get_json(self.insert_request(row), "POST projects")
            .await?;
        only_row(rows)
    }

    #[tracing::instrument(level = "debug", skip(self, row))]
    async fn update(&self, id: &str, row: &NewProjectRow) -> Result<()> {
        self.send_without_body(self.update_request(id, row), "PATCH projects")
            .await
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn update_status(&self, id: &str, status: Status) -> Result<()> {
        self.send_without_body(
            self.update_status_request(id, status),
            "PATCH projects status",
        )
        .await
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn delete(&self, id: &str) -> Result<()> {
        self.send_without_body(self.delete_request(id), "DELETE projects")
            .await
    }
}
