use crate::error::ApiError;
use crate::models::{Created, NewVocab, QuizSet, VocabEntry};

use super::ApiClient;

const VOCAB: &str = "/api/vocab/";

impl ApiClient {
    pub async fn list_vocab(&self) -> Result<Vec<VocabEntry>, ApiError> {
        self.get(VOCAB).await
    }

    pub async fn add_vocab(&self, entry: &NewVocab) -> Result<Created, ApiError> {
        self.post(VOCAB, entry).await
    }

    pub async fn quiz(&self) -> Result<QuizSet, ApiError> {
        self.get("/api/vocab/quiz").await
    }
}
