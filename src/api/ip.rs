//! Device IP lookup — audit field on document acknowledgements.

use std::net::IpAddr;

use tokio::net::UdpSocket;

use crate::error::ApiError;

/// Determine the device's outbound IP address.
///
/// Binds a UDP socket and connects it toward a public address; no packet is
/// sent, the OS just selects the local interface that would be used.
pub async fn device_ip() -> Result<IpAddr, ApiError> {
    let socket = UdpSocket::bind("0.0.0.0:0")
        .await
        .map_err(|e| ApiError::IpLookup(e.to_string()))?;
    socket
        .connect("8.8.8.8:53")
        .await
        .map_err(|e| ApiError::IpLookup(e.to_string()))?;
    let addr = socket
        .local_addr()
        .map_err(|e| ApiError::IpLookup(e.to_string()))?;
    Ok(addr.ip())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn device_ip_is_not_unspecified() {
        // Needs a routing table; any machine running the suite has one.
        if let Ok(ip) = device_ip().await {
            assert!(!ip.is_unspecified());
        }
    }
}
