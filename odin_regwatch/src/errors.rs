/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use thiserror::Error;

pub type Result<T> = std::result::Result<T,OdinRegWatchError>;

#[derive(Error,Debug)]
pub enum OdinRegWatchError {
    #[error("parse error {0}")]
    ParseError(String),

    #[error("IO error {0}")]
    IOError( #[from] std::io::Error),

    #[error("http error {0}")]
    HttpError( #[from] reqwest::Error),

    /// the server responded with a non-success status
    #[error("request failed with status {0}: {1}")]
    StatusError( reqwest::StatusCode, String),

    #[error("url error {0}")]
    UrlError( #[from] url::ParseError),

    #[error("JSON error {0}")]
    JsonError( #[from] serde_json::Error),

    #[error("config error {0}")]
    ConfigError( #[from] odin_common::config::OdinConfigError),

    #[error("slack error {0}")]
    SlackError( #[from] odin_common::slack::OdinSlackError),

    #[error("operation failed {0}")]
    OpFailedError(String)
}

impl OdinRegWatchError {
    /// is this a failure that might go away if we try again later. Client error status codes other than
    /// timeouts and rate limiting (e.g. 401/403 for invalid or unsubscribed API keys) are permanent
    pub fn is_transient (&self)->bool {
        match self {
            OdinRegWatchError::HttpError(e) => e.is_connect() || e.is_timeout() || e.is_request() || e.is_body(),
            OdinRegWatchError::IOError(_) | OdinRegWatchError::OpFailedError(_) => true,
            OdinRegWatchError::StatusError(status,_) => is_transient_status( *status),
            _ => false
        }
    }
}

pub fn is_transient_status (status: reqwest::StatusCode)->bool {
    status.is_server_error()
        || status == reqwest::StatusCode::REQUEST_TIMEOUT
        || status == reqwest::StatusCode::TOO_MANY_REQUESTS
}

macro_rules! parse_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        crate::errors::OdinRegWatchError::ParseError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use parse_error;

