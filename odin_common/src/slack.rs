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

//! slack web api abstraction

use reqwest::Client;
use serde::{Serialize,Deserialize};
use crate::define_error;

pub const POST_MESSAGE_URL: &str = "https://slack.com/api/chat.postMessage";

define_error!{ pub OdinSlackError =
    HttpError(#[from] reqwest::Error) : "http error: {0}",
    ApiError(String) : "slack API error: {0}"
}

pub type Result<T> = std::result::Result<T,OdinSlackError>;

/// the part of the Web API response we care about. Note that Slack reports most failures
/// with a 200 status and `ok: false`
#[derive(Deserialize,Debug)]
struct ApiResponse {
    ok: bool,
    error: Option<String>
}

#[derive(Serialize)]
struct WebhookMsg<'a> {
    text: &'a str
}

/// send chat text message through the Web API (requires a bot token with chat:write scope)
/// note - icon replaces avatar, but ony in the first of a sequence of messages from the same sender
pub async fn send_msg (client: &Client, token: &str, channel_id: &str, msg: &str, icon: Option<&str>) -> Result<()> {
    let mut params: Vec<(&str,&str)> = Vec::new();
    params.push( ("channel", channel_id) );
    params.push( ("text", msg) );
    if let Some(icon_name) = icon { params.push( ("icon_emoji", icon_name) ); }

    let resp: ApiResponse = client.post( POST_MESSAGE_URL)
        .bearer_auth( token)
        .query( &params)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    if resp.ok {
        Ok(())
    } else {
        Err( OdinSlackError::ApiError( resp.error.unwrap_or_else(|| "unknown".to_string())))
    }
}

/// send chat text message through an incoming webhook URL (the URL already identifies the channel)
pub async fn send_webhook_msg (client: &Client, url: &str, msg: &str) -> Result<()> {
    let resp = client.post( url)
        .json( &WebhookMsg{ text: msg })
        .send()
        .await?;

    let status = resp.status();
    if status.is_success() {
        Ok(())
    } else {
        Err( OdinSlackError::ApiError( format!("webhook response status {status}")))
    }
}
