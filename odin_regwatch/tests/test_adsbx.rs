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
#![allow(unused)]

use std::{net::SocketAddr, sync::{Arc, atomic::{AtomicUsize, Ordering}}};
use reqwest::StatusCode;
use tokio::{io::{AsyncReadExt, AsyncWriteExt}, net::TcpListener};
use odin_common::{config::config_from_str, datetime::EpochMillis};
use odin_regwatch::{
    AdsbxPoller, PollOutcome, PollSample, RegWatchConfig, SampleSource,
    errors::{OdinRegWatchError, is_transient_status},
    poller::parse_adsbx_response
};

/// tests for parsing ADS-B Exchange registration query responses
/// run with "cargo test --test test_adsbx -- --nocapture"

const AIRBORNE: &str = r#"{
  "ac": [
    { "hex": "ad6b9f", "type": "adsb_icao", "flight": "NASA809 ", "r": "N809NA", "t": "ER2",
      "alt_baro": 62000, "gs": 385.2, "track": 271.4, "lat": 35.1, "lon": -117.9 }
  ],
  "msg": "No error", "now": 1700000000123, "total": 1, "ctime": 1700000000450, "ptime": 0
}"#;

const TAXIING: &str = r#"{ "ac": [ { "hex": "ad6b9f", "r": "N809NA", "alt_baro": "ground", "gs": 12.0 } ], "now": 1700000000000.5, "total": 1 }"#;

const NOT_REPORTED: &str = r#"{ "ac": [], "msg": "No error", "now": 1700000000000, "total": 0 }"#;

const NULL_AC: &str = r#"{ "ac": null, "msg": "No error", "now": 1700000000000 }"#;

const NO_GS: &str = r#"{ "ac": [ { "hex": "ad6b9f", "r": "N809NA", "alt_baro": "ground" } ], "now": 1700000000000 }"#;

const NO_NOW: &str = r#"{ "message": "You are not subscribed to this API." , "msg": "not subscribed" }"#;

const NO_AC: &str = r#"{ "msg": "No error", "now": 1700000000000 }"#;

const BAD_AC: &str = r#"{ "ac": "N809NA", "now": 1700000000000 }"#;

#[test]
fn test_airborne () {
    let outcome = parse_adsbx_response( AIRBORNE).unwrap();
    println!("{outcome:?}");
    assert_eq!( outcome, PollOutcome::Sample( PollSample::on( EpochMillis::new(1700000000123), 385.2)));
}

#[test]
fn test_taxiing () {
    match parse_adsbx_response( TAXIING).unwrap() {
        PollOutcome::Sample(sample) => {
            println!("{sample}");
            assert!( sample.transponder_on);
            assert_eq!( sample.airspeed, Some(12.0));
            assert_eq!( sample.timestamp, EpochMillis::new(1700000000000));
        }
        other => panic!("unexpected outcome {other:?}")
    }
}

#[test]
fn test_not_reported () {
    let expected = PollOutcome::Sample( PollSample::off( EpochMillis::new(1700000000000)));
    assert_eq!( parse_adsbx_response( NOT_REPORTED).unwrap(), expected);
    assert_eq!( parse_adsbx_response( NULL_AC).unwrap(), expected);
}

#[test]
fn test_skip_without_groundspeed () {
    let outcome = parse_adsbx_response( NO_GS).unwrap();
    println!("{outcome:?}");
    assert!( matches!( outcome, PollOutcome::Skip(_)));
}

#[test]
fn test_malformed () {
    for data in [NO_NOW, NO_AC, BAD_AC] {
        let res = parse_adsbx_response( data);
        println!("{res:?}");
        assert!( matches!( res, Err(OdinRegWatchError::ParseError(_))));
    }

    let res = parse_adsbx_response( "<html>502 Bad Gateway</html>");
    assert!( matches!( res, Err(OdinRegWatchError::JsonError(_))));
}

#[test]
fn test_malformed_is_not_transient () {
    let err = parse_adsbx_response( NO_AC).unwrap_err();
    assert!( !err.is_transient());
}

#[test]
fn test_registration_url () {
    let config: RegWatchConfig = config_from_str( r#"RegWatchConfig(
        api_url: "https://adsbexchange-com1.p.rapidapi.com/v2/registration/",
        api_host: "adsbexchange-com1.p.rapidapi.com",
        api_key: "42",
        aircraft: [ ( registration: "N809NA", description: "NASA ER-2" ) ]
    )"#).unwrap();

    let poller = AdsbxPoller::new( &config).unwrap();
    let url = poller.registration_url( "N809NA").unwrap();
    println!("{url}");
    assert_eq!( url.as_str(), "https://adsbexchange-com1.p.rapidapi.com/v2/registration/N809NA/");
}

/* #region local server tests ***************************************************************************/

const NOT_SUBSCRIBED: &str = r#"{"message":"You are not subscribed to this API."}"#;

/// minimal HTTP server that answers every request with the same status and body, counting requests
async fn spawn_server (status: &'static str, body: &'static str)->(SocketAddr, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new( AtomicUsize::new(0));
    let counter = requests.clone();

    tokio::spawn( async move {
        while let Ok((mut socket,_)) = listener.accept().await {
            let mut buf = [0u8; 4096];
            let mut request: Vec<u8> = Vec::new();
            while !request.windows(4).any( |w| w == b"\r\n\r\n".as_slice()) {
                match socket.read( &mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice( &buf[..n])
                }
            }
            counter.fetch_add( 1, Ordering::SeqCst);

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all( response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    (addr, requests)
}

fn local_poller (addr: SocketAddr, max_retry: u32)->AdsbxPoller {
    let config: RegWatchConfig = config_from_str( &format!(r#"RegWatchConfig(
        api_url: "http://{addr}/v2/registration",
        api_host: "localhost",
        api_key: "42",
        retry: ( max_retry: {max_retry}, retry_delay: "1ms", max_delay: "5ms" ),
        aircraft: [ ( registration: "N809NA", description: "NASA ER-2" ) ]
    )"#)).unwrap();

    AdsbxPoller::new( &config).unwrap()
}

#[test]
fn test_transient_status () {
    for (status, expected) in [
        (StatusCode::BAD_REQUEST, false), (StatusCode::UNAUTHORIZED, false), (StatusCode::FORBIDDEN, false),
        (StatusCode::NOT_FOUND, false), (StatusCode::REQUEST_TIMEOUT, true), (StatusCode::TOO_MANY_REQUESTS, true),
        (StatusCode::INTERNAL_SERVER_ERROR, true), (StatusCode::BAD_GATEWAY, true), (StatusCode::SERVICE_UNAVAILABLE, true)
    ] {
        println!("  {status} -> {expected}");
        assert_eq!( is_transient_status( status), expected);
        assert_eq!( OdinRegWatchError::StatusError( status, String::new()).is_transient(), expected);
    }
}

#[tokio::test]
async fn test_forbidden_is_not_retried () {
    let (addr, requests) = spawn_server( "403 Forbidden", NOT_SUBSCRIBED).await;
    let poller = local_poller( addr, 5);

    let res = poller.poll( "N809NA").await;
    println!("{res:?}, requests sent: {}", requests.load( Ordering::SeqCst));

    match res {
        Err(OdinRegWatchError::StatusError(status, msg)) => {
            assert_eq!( status, StatusCode::FORBIDDEN);
            assert!( msg.contains("not subscribed"));
        }
        other => panic!("unexpected result {other:?}")
    }
    assert_eq!( requests.load( Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unavailable_is_retried () {
    let (addr, requests) = spawn_server( "503 Service Unavailable", r#"{"msg":"overloaded"}"#).await;
    let poller = local_poller( addr, 2);

    let res = poller.poll( "N809NA").await;
    println!("{res:?}, requests sent: {}", requests.load( Ordering::SeqCst));

    assert!( matches!( res, Err(OdinRegWatchError::StatusError(StatusCode::SERVICE_UNAVAILABLE, _))));
    assert_eq!( requests.load( Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_local_poll () {
    let (addr, requests) = spawn_server( "200 OK", NOT_REPORTED).await;
    let poller = local_poller( addr, 5);

    let outcome = poller.poll( "N809NA").await.unwrap();
    assert_eq!( outcome, PollOutcome::Sample( PollSample::off( EpochMillis::new(1700000000000))));
    assert_eq!( requests.load( Ordering::SeqCst), 1);
}

/* #endregion local server tests */
