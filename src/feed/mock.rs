//! Mock feed for testing and development
//!
//! Replays a fixed script of responses, one per fetch. Once the script is
//! exhausted every further fetch fails.

use super::ResultFeed;
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Scripted response
#[derive(Debug, Clone)]
pub enum MockResponse {
    Result(String),
    Failure(String),
}

/// Mock feed replaying scripted responses in order
#[derive(Debug, Default)]
pub struct MockFeed {
    script: Mutex<VecDeque<MockResponse>>,
}

impl MockFeed {
    pub fn new(script: impl IntoIterator<Item = MockResponse>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
        }
    }

    /// Script that only ever returns successful fetches
    pub fn from_labels(labels: &[String]) -> Self {
        Self::new(labels.iter().cloned().map(MockResponse::Result))
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().map(|s| s.len()).unwrap_or(0)
    }
}

#[async_trait]
impl ResultFeed for MockFeed {
    async fn fetch_result(&self) -> Result<String> {
        let next = self
            .script
            .lock()
            .map_err(|_| Error::fetch("mock script lock poisoned"))?
            .pop_front();

        match next {
            Some(MockResponse::Result(label)) => {
                tracing::debug!("Mock feed returned {:?}", label);
                Ok(label)
            }
            Some(MockResponse::Failure(msg)) => Err(Error::FetchFailure(msg)),
            None => Err(Error::fetch("mock script exhausted")),
        }
    }
}
