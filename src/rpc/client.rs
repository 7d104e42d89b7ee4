use std::str::FromStr;

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{header, Request};
use hyper_util::rt::TokioIo;
use serde::Deserialize;
use tokio::net::TcpStream;

use super::{Endpoint, PublishConfig};
use crate::blocks::SendBlock;
use crate::keys::Hash;
use crate::util::Error;
use crate::{log_debug, log_error, log_info, log_warn};

/// Submits finished blocks to the delegate each block routes to.
///
/// One publisher per configuration. There is no retry or backoff here;
/// transport failures surface to the caller as-is.
pub struct Publisher {
    config: PublishConfig,
}

#[derive(Deserialize)]
struct ProcessResponse {
    hash: Option<String>,
    error: Option<String>,
}

impl Publisher {
    pub fn new(config: PublishConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PublishConfig {
        &self.config
    }

    /// Routes the block to its delegate, submits it, and returns the hash
    /// the network confirmed.
    pub async fn publish(&self, block: &mut SendBlock) -> Result<Hash, Error> {
        let index = block.delegate_index()?;
        let delegate = self.config.delegate(index);
        let body = block.to_json(false)?;
        let response = self.post(delegate, body).await?;
        match response {
            ProcessResponse {
                hash: Some(hash), ..
            } => {
                let hash = Hash::from_str(&hash)?;
                log_info!("delegate {} at {} accepted block {}", index, delegate, hash);
                Ok(hash)
            }
            ProcessResponse {
                error: Some(error), ..
            } => {
                log_warn!("delegate {} at {} rejected block: {}", index, delegate, error);
                Err(Error::Rejected(error))
            }
            _ => Err(Error::Rejected("empty response from delegate".to_string())),
        }
    }

    async fn post(&self, delegate: Endpoint, body: String) -> Result<ProcessResponse, Error> {
        // With a proxy we speak absolute-form to the proxy; otherwise
        // origin-form straight to the delegate.
        let (connect_to, uri) = match self.config.proxy {
            Some(proxy) => (proxy, format!("http://{}/", delegate)),
            None => (delegate, "/".to_string()),
        };
        log_debug!("POST {} via {}", uri, connect_to);
        let stream = TcpStream::connect(connect_to.to_socket_addr()).await?;
        let io = TokioIo::new(stream);
        let (mut sender, connection) = hyper::client::conn::http1::handshake(io).await?;
        tokio::task::spawn(async move {
            if let Err(e) = connection.await {
                log_error!("connection to delegate failed: {}", e);
            }
        });

        let request = Request::post(uri)
            .header(header::HOST, delegate.to_string())
            .header(header::CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(body)))?;
        let response = sender.send_request(request).await?;
        let bytes = response.collect().await?.to_bytes();
        Ok(serde_json::from_slice(&bytes)?)
    }
}
