use anyhow::{anyhow, Context, Result};
use futures::{FutureExt, Stream, StreamExt};
use tokio::runtime::{Builder, Runtime};
use tokio::time::{timeout_at, Duration, Instant};
use tokio_socketcan::{CANFrame, CANSocket};
use tracing::{debug, info, warn};

use super::protocol::{
    self, api_ids, decode_param_response, encode_param_request, encode_param_set, encode_value,
    match_response, ParamResponse, ParamValue,
};
use crate::channel::{read_timeout_ms, ParameterChannel};
use crate::param::ParamEnum;
use crate::status::StatusCode;

/// Blocking parameter channel over a SocketCAN interface
///
/// Owns a current-thread runtime and drives one frame exchange per call.
pub struct SocketCanChannel {
    runtime: Runtime,
    socket: CANSocket,
    interface_name: String,
    base_id: u32,
}

impl SocketCanChannel {
    /// Open a CAN interface for one Victor SPX
    ///
    /// # Arguments
    /// * `interface` - CAN interface name (e.g., "can0", "vcan0")
    /// * `device_number` - CAN device number [0, 62]
    pub fn open(interface: &str, device_number: u8) -> Result<Self> {
        info!("Connecting to CAN interface: {}", interface);

        let base_id = protocol::base_arbitration_id(device_number)
            .ok_or_else(|| anyhow!("Device number {} out of range", device_number))?;

        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to build CAN runtime")?;

        // The socket registers with the runtime's reactor
        let socket = {
            let _guard = runtime.enter();
            CANSocket::open(interface)
                .with_context(|| format!("Failed to open CAN interface: {}", interface))?
        };

        info!("Successfully connected to {}", interface);
        Ok(Self {
            runtime,
            socket,
            interface_name: interface.to_string(),
            base_id,
        })
    }

    /// Get current interface name
    pub fn interface_name(&self) -> &str {
        &self.interface_name
    }

    pub fn base_id(&self) -> u32 {
        self.base_id
    }

    /// Send one parameter frame and optionally wait for the matching response
    ///
    /// # Arguments
    /// * `api` - API of the outgoing frame
    /// * `data` - Payload; bytes 0..3 identify the parameter
    /// * `timeout_ms` - Response timeout, `None` = do not wait
    ///
    /// # Returns
    /// * `Ok(Some(response))` if the device answered
    /// * `Ok(None)` if not waiting
    /// * `Err(status)` on send failure or timeout
    fn exchange(
        &mut self,
        api: u32,
        data: [u8; 8],
        timeout_ms: Option<u64>,
    ) -> Result<Option<ParamResponse>, StatusCode> {
        let request_id = protocol::frame_id(self.base_id, api).ok_or(StatusCode::GeneralError)?;
        let response_id =
            protocol::frame_id(self.base_id, api_ids::PARAM_RESPONSE).ok_or(StatusCode::GeneralError)?;
        let param_id = u16::from_le_bytes([data[0], data[1]]);
        let ordinal = data[2];

        let Self {
            runtime, socket, ..
        } = self;

        runtime.block_on(async {
            let frame = match CANFrame::new(request_id.as_raw(), &data, false, false) {
                Ok(frame) => frame,
                Err(e) => {
                    warn!("Failed to create CAN frame with ID 0x{:X}: {}", request_id.as_raw(), e);
                    return Err(StatusCode::GeneralError);
                }
            };

            // Answers to earlier fire-and-forget writes must not match this request
            let stale = drain_pending(&mut *socket);
            if stale > 0 {
                debug!("Dropped {} stale CAN frames", stale);
            }

            debug!("Sending CAN frame: ID=0x{:X}, len={}", request_id.as_raw(), data.len());
            let write = match socket.write_frame(frame) {
                Ok(write) => write,
                Err(e) => {
                    warn!("Failed to queue CAN frame with ID 0x{:X}: {}", request_id.as_raw(), e);
                    return Err(StatusCode::TxFailed);
                }
            };
            if let Err(e) = write.await {
                warn!("Failed to send CAN frame with ID 0x{:X}: {}", request_id.as_raw(), e);
                return Err(StatusCode::TxFailed);
            }

            let Some(timeout_ms) = timeout_ms else {
                return Ok(None);
            };
            let deadline = Instant::now() + Duration::from_millis(timeout_ms);

            loop {
                match timeout_at(deadline, socket.next()).await {
                    Ok(Some(Ok(frame))) => {
                        if frame.id() != response_id.as_raw() {
                            continue;
                        }
                        let Some(response) = decode_param_response(frame.data()) else {
                            continue;
                        };
                        // Responses to other parameters are stale answers
                        if let Ok(response) = match_response(response, param_id, ordinal) {
                            return Ok(Some(response));
                        }
                    }
                    Ok(Some(Err(e))) => {
                        warn!("CAN receive error: {}", e);
                        return Err(StatusCode::GeneralError);
                    }
                    Ok(None) => {
                        warn!("CAN socket closed");
                        return Err(StatusCode::GeneralError);
                    }
                    Err(_) => return Err(StatusCode::RxTimeout),
                }
            }
        })
    }

    fn write(&mut self, param: ParamEnum, value: ParamValue, ordinal: i32, timeout_ms: u64) -> StatusCode {
        let Ok(ordinal) = u8::try_from(ordinal) else {
            return StatusCode::InvalidParamValue;
        };
        let data = encode_param_set(param.id(), ordinal, value);
        let wait = (timeout_ms > 0).then_some(timeout_ms);

        match self.exchange(api_ids::PARAM_SET, data, wait) {
            Ok(Some(response)) => response.status,
            Ok(None) => StatusCode::Ok,
            Err(status) => status,
        }
    }
}

impl ParameterChannel for SocketCanChannel {
    fn set_parameter(
        &mut self,
        param: ParamEnum,
        value: f64,
        ordinal: i32,
        timeout_ms: u64,
    ) -> StatusCode {
        let Some(value) = encode_value(param, value) else {
            warn!("{} does not fit {:?}", value, param);
            return StatusCode::InvalidParamValue;
        };
        self.write(param, value, ordinal, timeout_ms)
    }

    fn get_parameter(
        &mut self,
        param: ParamEnum,
        ordinal: i32,
        timeout_ms: u64,
    ) -> Result<f64, StatusCode> {
        let ordinal = u8::try_from(ordinal).map_err(|_| StatusCode::InvalidParamValue)?;
        let data = encode_param_request(param.id(), ordinal);

        let response = self
            .exchange(api_ids::PARAM_REQUEST, data, Some(read_timeout_ms(timeout_ms)))?
            .ok_or(StatusCode::RxTimeout)?;

        if response.status.is_error() {
            return Err(response.status);
        }
        Ok(response.value())
    }

    fn set_combined_parameter(
        &mut self,
        param: ParamEnum,
        bitfield: u32,
        sub_index: i32,
        timeout_ms: u64,
    ) -> StatusCode {
        self.write(param, ParamValue::Bitfield(bitfield), sub_index, timeout_ms)
    }
}

/// Discard every item a stream has ready without waiting
///
/// # Returns
/// Number of discarded items
fn drain_pending<S: Stream + Unpin>(frames: &mut S) -> usize {
    let mut dropped = 0;
    while let Some(Some(_)) = frames.next().now_or_never() {
        dropped += 1;
    }
    dropped
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn response_frame(base_id: u32, param: ParamEnum, value: i32) -> CANFrame {
        let id = protocol::frame_id(base_id, api_ids::PARAM_RESPONSE).unwrap();
        let data = protocol::encode_param_response(
            param.id(),
            0,
            StatusCode::Ok,
            ParamValue::Integer(value).bits(),
        );
        CANFrame::new(id.as_raw(), &data, false, false).unwrap()
    }

    #[test]
    fn test_drain_pending_drops_queued_frames() {
        let base_id = protocol::base_arbitration_id(3).unwrap();
        let queued = vec![
            response_frame(base_id, ParamEnum::CustomParam, 1),
            response_frame(base_id, ParamEnum::CustomParam, 2),
        ];
        let mut frames = stream::iter(queued).chain(stream::pending());

        assert_eq!(drain_pending(&mut frames), 2);
        assert_eq!(drain_pending(&mut frames), 0);
    }

    #[test]
    fn test_drain_pending_on_closed_stream() {
        let mut frames = stream::iter(Vec::<CANFrame>::new());
        assert_eq!(drain_pending(&mut frames), 0);
    }
}
