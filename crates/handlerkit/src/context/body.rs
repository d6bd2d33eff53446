use axum::body::{to_bytes, Bytes};
use handlerkit_core::{validation::Validate, HandlerError};
use serde::de::DeserializeOwned;

use super::RequestContext;

impl RequestContext {
    /// Decodes the JSON body into `T`, validates it and applies defaults.
    ///
    /// The body is consumed: a second call (or `load_body_multi` after
    /// this) sees an empty body and fails to decode.
    ///
    /// # Errors
    ///
    /// - [`HandlerError::Decode`] for malformed JSON; validation does not run
    /// - [`HandlerError::Coded`] for the first failing field, with the rule
    ///   name as code
    pub async fn load_body<T>(&mut self) -> Result<T, HandlerError>
    where
        T: DeserializeOwned + Validate,
    {
        let bytes = self.read_body().await?;
        self.decode(&bytes)
    }

    /// Like [`RequestContext::load_body`], but caches the bytes so any
    /// number of consumers can load the same body.
    pub async fn load_body_multi<T>(&mut self) -> Result<T, HandlerError>
    where
        T: DeserializeOwned + Validate,
    {
        let bytes = match &self.buffered {
            Some(bytes) => bytes.clone(),
            None => {
                let bytes = self.read_body().await?;
                self.buffered = Some(bytes.clone());
                bytes
            }
        };
        self.decode(&bytes)
    }

    async fn read_body(&mut self) -> Result<Bytes, HandlerError> {
        let Some(body) = self.body.take() else {
            return Ok(Bytes::new());
        };

        to_bytes(body, self.body_limit)
            .await
            .map_err(|e| HandlerError::Other(anyhow::anyhow!("failed to read request body: {e}")))
    }

    fn decode<T>(&self, bytes: &[u8]) -> Result<T, HandlerError>
    where
        T: DeserializeOwned + Validate,
    {
        let mut target: T = serde_json::from_slice(bytes)?;
        target.validate(&self.validator)?;
        target.apply_defaults();
        Ok(target)
    }
}
