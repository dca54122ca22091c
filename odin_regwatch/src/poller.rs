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

use std::{future::Future, time::Duration};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, header::{HeaderMap, HeaderName, HeaderValue}};
use serde::{Serialize,Deserialize};
use serde_json::Value;
use tracing::{debug, info};
use url::Url;
use odin_common::datetime::{self, EpochMillis, deserialize_duration, serialize_duration};

use crate::{
    RegWatchConfig, aircraft::PollSample,
    errors::{OdinRegWatchError, parse_error, Result}
};

/// what we get from polling a registration
#[derive(Debug,Clone,PartialEq)]
pub enum PollOutcome {
    Sample(PollSample),
    /// the response was usable but incomplete for this aircraft, i.e. it should not be evaluated this time
    Skip(String),
}

/// abstraction of where we get aircraft samples from. This is the seam that allows to run cycles
/// without network access.
/// Implementations are responsible for handling transient failures - if `poll` returns an error the
/// aircraft is skipped for the current cycle
#[async_trait]
pub trait SampleSource: Send + Sync {
    async fn poll (&self, registration: &str)->Result<PollOutcome>;
}

/* #region retry policy ********************************************************************************/

/// bounded retry with exponential backoff. The n-th retry (0-based) waits `retry_delay * backoff^n`,
/// capped at `max_delay`
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_retry: u32,

    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub retry_delay: Duration,

    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub max_delay: Duration,

    pub backoff: f64,
}

impl Default for RetryPolicy {
    fn default()->Self {
        RetryPolicy {
            max_retry: 5,
            retry_delay: datetime::secs(30),
            max_delay: datetime::minutes(5),
            backoff: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn no_retry ()->Self {
        RetryPolicy { max_retry: 0, ..Default::default() }
    }

    pub fn delay_for (&self, retry: u32)->Duration {
        let factor = self.backoff.max(1.0).powi( retry.min(i32::MAX as u32) as i32);
        let secs = self.retry_delay.as_secs_f64() * factor;
        let max_secs = self.max_delay.as_secs_f64();

        if secs.is_finite() && secs < max_secs { Duration::from_secs_f64( secs) } else { self.max_delay }
    }
}

/// execute `op` until it succeeds, fails with a non-transient error or we run out of retries
pub async fn with_retry<T,F,Fut> (policy: &RetryPolicy, what: &str, mut op: F)->Result<T>
    where F: FnMut()->Fut, Fut: Future<Output=Result<T>>
{
    let mut retry = 0;
    loop {
        match op().await {
            Ok(v) => return Ok(v),
            Err(e) => {
                if e.is_transient() && retry < policy.max_retry {
                    let delay = policy.delay_for( retry);
                    retry += 1;
                    info!("{what} failed ({e}), retry {retry}/{} in {} sec", policy.max_retry, delay.as_secs_f64());
                    tokio::time::sleep( delay).await;
                } else {
                    return Err(e)
                }
            }
        }
    }
}

/* #endregion retry policy */

/* #region ADS-B Exchange *******************************************************************************/

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// live [`SampleSource`] that uses the RapidAPI hosted ADS-B Exchange registration query
pub struct AdsbxPoller {
    client: Client,
    api_url: String,
    headers: HeaderMap,
    retry: RetryPolicy,
}

impl AdsbxPoller {
    pub fn new (config: &RegWatchConfig)->Result<Self> {
        let client = Client::builder().timeout( REQUEST_TIMEOUT).build()?;
        let api_url = config.api_url.trim_end_matches('/').to_string();
        let headers = rapidapi_headers( &config.api_key, &config.api_host)?;
        let retry = config.retry.clone();

        Ok( AdsbxPoller { client, api_url, headers, retry } )
    }

    pub fn registration_url (&self, registration: &str)->Result<Url> {
        Ok( Url::parse( &format!("{}/{}/", self.api_url, registration))? )
    }

    async fn fetch (&self, url: &Url)->Result<String> {
        let response = self.client.get( url.clone())
            .headers( self.headers.clone())
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::OK {
            Ok( response.text().await? )
        } else {
            // RapidAPI reports subscription and key problems as JSON `message` in the body
            let body = response.text().await.unwrap_or_default();
            Err( OdinRegWatchError::StatusError( status, error_message( &body)))
        }
    }
}

#[async_trait]
impl SampleSource for AdsbxPoller {
    async fn poll (&self, registration: &str)->Result<PollOutcome> {
        let url = &self.registration_url( registration)?;
        let data = with_retry( &self.retry, registration, move || self.fetch( url)).await?;
        debug!("{registration} response: {data}");

        parse_adsbx_response( &data)
    }
}

/// the `message` (RapidAPI) or `msg` (ADS-B Exchange) field of an error response body, or the body itself
fn error_message (body: &str)->String {
    let json_msg = serde_json::from_str::<Value>( body).ok().and_then( |json| {
        json.get("message").or_else( || json.get("msg")).and_then( Value::as_str).map( str::to_string)
    });
    json_msg.unwrap_or_else( || body.chars().take(200).collect())
}

fn rapidapi_headers (api_key: &str, api_host: &str)->Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static("x-rapidapi-key"),
        HeaderValue::from_str( api_key).map_err(|_| parse_error!("invalid API key"))?
    );
    headers.insert(
        HeaderName::from_static("x-rapidapi-host"),
        HeaderValue::from_str( api_host).map_err(|_| parse_error!("invalid API host {api_host}"))?
    );
    Ok(headers)
}

/// translate an ADS-B Exchange (v2) registration query response into a sample.
/// The response time is taken from the mandatory `now` field (epoch millis). An empty or `null` `ac`
/// array means the aircraft is not reported (transponder off). If it is reported we use the groundspeed
/// (`gs`, in knots) of the first entry since `tas` and `ias` are not available for all aircraft.
/// A reported aircraft without `gs` is skipped
pub fn parse_adsbx_response (data: &str)->Result<PollOutcome> {
    let json: Value = serde_json::from_str( data)?;

    let now = match json.get("now").and_then( Value::as_f64) {
        Some(now) => EpochMillis::from_f64_millis( now),
        None => {
            return match json.get("msg").and_then( Value::as_str) {
                Some(msg) => Err( parse_error!("no 'now' in response, msg: {msg}")),
                None => Err( parse_error!("no 'now' in response"))
            }
        }
    };

    match json.get("ac") {
        Some(Value::Array(entries)) => {
            if let Some(entry) = entries.first() {
                match entry.get("gs").and_then( Value::as_f64) {
                    Some(gs) => Ok( PollOutcome::Sample( PollSample::on( now, gs))),
                    None => Ok( PollOutcome::Skip( "no groundspeed for reported aircraft".to_string()))
                }
            } else {
                Ok( PollOutcome::Sample( PollSample::off( now)))
            }
        }
        Some(Value::Null) => Ok( PollOutcome::Sample( PollSample::off( now))),
        Some(other) => Err( parse_error!("unexpected 'ac' value {other}")),
        None => Err( parse_error!("no 'ac' in response"))
    }
}

/* #endregion ADS-B Exchange */
