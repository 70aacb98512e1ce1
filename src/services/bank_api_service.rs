use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use tracing::warn;
use uuid::Uuid;
use validator::Validate;

use crate::config::Config;
use crate::dto::save_dto::SaveTestPayload;
use crate::error::{Error, Result};
use crate::models::answer_type::AnswerType;
use crate::models::question_set::QuestionSet;

/// Remote question bank the editor loads from and saves to. Abstracted from
/// the concrete transport so tests can substitute a mock.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionBankApi: Send + Sync {
    async fn load_question_set(&self, chapter_id: Uuid) -> Result<QuestionSet>;

    /// Full-replace save. Returns the canonical document, including ids
    /// assigned to newly created questions and answers.
    async fn save_question_set(
        &self,
        chapter_id: Uuid,
        payload: &SaveTestPayload,
    ) -> Result<QuestionSet>;

    async fn load_answer_types(&self) -> Result<Vec<AnswerType>>;
}

pub struct HttpQuestionBankApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpQuestionBankApi {
    pub fn from_config(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("Failed to create HTTP client for the question bank");

        Self {
            client,
            base_url: config.bank_api_base_url.trim_end_matches('/').to_string(),
            token: config.bank_api_token.clone(),
        }
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn question_set_url(&self, chapter_id: Uuid) -> String {
        format!("{}/chapters/{}/question-set", self.base_url, chapter_id)
    }
}

#[async_trait]
impl QuestionBankApi for HttpQuestionBankApi {
    async fn load_question_set(&self, chapter_id: Uuid) -> Result<QuestionSet> {
        let url = self.question_set_url(chapter_id);
        let response = self
            .request(Method::GET, url)
            .send()
            .await
            .map_err(|e| Error::RemoteLoad(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%chapter_id, %status, "question set load rejected");
            return Err(Error::RemoteLoad(format!("HTTP {}: {}", status, body)));
        }

        response
            .json::<QuestionSet>()
            .await
            .map_err(|e| Error::RemoteLoad(format!("bad response body: {}", e)))
    }

    async fn save_question_set(
        &self,
        chapter_id: Uuid,
        payload: &SaveTestPayload,
    ) -> Result<QuestionSet> {
        payload.validate()?;

        let url = self.question_set_url(chapter_id);
        let response = self
            .request(Method::PUT, url)
            .json(payload)
            .send()
            .await
            .map_err(|e| Error::RemoteSave(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%chapter_id, %status, "question set save rejected");
            return Err(Error::RemoteSave(format!("HTTP {}: {}", status, body)));
        }

        response
            .json::<QuestionSet>()
            .await
            .map_err(|e| Error::RemoteSave(format!("bad response body: {}", e)))
    }

    async fn load_answer_types(&self) -> Result<Vec<AnswerType>> {
        let url = format!("{}/answer-types", self.base_url);
        let response = self
            .request(Method::GET, url)
            .send()
            .await
            .map_err(|e| Error::RemoteLoad(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "answer type catalog load rejected");
            return Err(Error::RemoteLoad(format!("HTTP {}: {}", status, body)));
        }

        response
            .json::<Vec<AnswerType>>()
            .await
            .map_err(|e| Error::RemoteLoad(format!("bad response body: {}", e)))
    }
}
