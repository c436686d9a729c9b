use async_trait::async_trait;
use parley_core::ParticipantId;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};
use webrtc::api::API;
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::ice_transport::ice_candidate::RTCIceCandidateInit;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::sdp_type::RTCSdpType;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::RTCRtpTransceiverInit;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::rtp_transceiver::rtp_transceiver_direction::RTCRtpTransceiverDirection;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_remote::TrackRemote;

use crate::error::SessionError;
use crate::session::Role;
use crate::transport::{PeerTransport, TransportEvents, TransportFactory};

/// Default STUN server used when no ICE servers are configured.
pub const DEFAULT_STUN_ADDR: &str = "stun:stun.l.google.com:19302";

#[derive(Clone)]
pub struct RtcTransportConfig {
    pub ice_servers: Vec<String>,
}

impl Default for RtcTransportConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![DEFAULT_STUN_ADDR.to_owned()],
        }
    }
}

/// Opens `webrtc` peer connections that publish the local tracks and surface
/// each remote track as a stream.
pub struct RtcTransportFactory {
    api: Arc<API>,
    config: RtcTransportConfig,
    local_tracks: Vec<Arc<dyn TrackLocal + Send + Sync>>,
}

impl RtcTransportFactory {
    pub fn new(config: RtcTransportConfig) -> Result<Self, SessionError> {
        let mut media_engine = MediaEngine::default();
        media_engine.register_default_codecs()?;

        let registry = register_default_interceptors(Registry::new(), &mut media_engine)?;

        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .build();

        Ok(Self {
            api: Arc::new(api),
            config,
            local_tracks: Vec::new(),
        })
    }

    /// Local media sent to every peer.
    pub fn with_local_track(mut self, track: Arc<dyn TrackLocal + Send + Sync>) -> Self {
        self.local_tracks.push(track);
        self
    }

    fn rtc_configuration(&self) -> RTCConfiguration {
        let ice_servers = if self.config.ice_servers.is_empty() {
            vec![]
        } else {
            vec![RTCIceServer {
                urls: self.config.ice_servers.clone(),
                ..Default::default()
            }]
        };

        RTCConfiguration {
            ice_servers,
            ..Default::default()
        }
    }
}

#[async_trait]
impl TransportFactory for RtcTransportFactory {
    type Stream = Arc<TrackRemote>;

    async fn open(
        &self,
        peer_id: &ParticipantId,
        role: Role,
        events: TransportEvents<Self::Stream>,
    ) -> Result<Box<dyn PeerTransport>, SessionError> {
        let pc = Arc::new(self.api.new_peer_connection(self.rtc_configuration()).await?);

        for track in &self.local_tracks {
            pc.add_track(Arc::clone(track)).await?;
        }

        // An offer without media sections would never receive the peer's
        // tracks. The responder mirrors whatever the offer carries.
        if role == Role::Initiator && self.local_tracks.is_empty() {
            for kind in [RTPCodecType::Audio, RTPCodecType::Video] {
                pc.add_transceiver_from_kind(
                    kind,
                    Some(RTCRtpTransceiverInit {
                        direction: RTCRtpTransceiverDirection::Recvonly,
                        send_encodings: Vec::new(),
                    }),
                )
                .await?;
            }
        }

        let ice_events = events.clone();
        pc.on_ice_candidate(Box::new(move |candidate| {
            let events = ice_events.clone();
            Box::pin(async move {
                let Some(candidate) = candidate else {
                    return;
                };
                match candidate.to_json().map(|init| serde_json::to_value(&init)) {
                    Ok(Ok(value)) => events.candidate(value),
                    Ok(Err(e)) => warn!("Failed to encode ICE candidate: {}", e),
                    Err(e) => warn!("Failed to serialize ICE candidate: {}", e),
                }
            })
        }));

        let track_events = events.clone();
        pc.on_track(Box::new(move |track, _receiver, _transceiver| {
            let events = track_events.clone();
            Box::pin(async move {
                info!(
                    "Remote {} track from {}",
                    track.kind(),
                    events.peer_id()
                );
                events.stream(track);
            })
        }));

        let state_events = events;
        pc.on_peer_connection_state_change(Box::new(move |state| {
            let events = state_events.clone();
            Box::pin(async move {
                debug!("Peer connection {} state: {}", events.peer_id(), state);
                if state == RTCPeerConnectionState::Failed {
                    events.failed("peer connection failed");
                }
            })
        }));

        debug!("Opened peer connection to {} as {:?}", peer_id, role);
        Ok(Box::new(RtcTransport { pc }))
    }
}

pub struct RtcTransport {
    pc: Arc<RTCPeerConnection>,
}

fn decode_description(
    value: Value,
    expected: RTCSdpType,
) -> Result<RTCSessionDescription, SessionError> {
    let desc: RTCSessionDescription = serde_json::from_value(value)
        .map_err(|e| SessionError::MalformedSignal(e.to_string()))?;

    if desc.sdp_type != expected {
        return Err(SessionError::MalformedSignal(format!(
            "expected {} description, got {}",
            expected, desc.sdp_type
        )));
    }
    Ok(desc)
}

#[async_trait]
impl PeerTransport for RtcTransport {
    async fn create_offer(&self) -> Result<Value, SessionError> {
        let offer = self.pc.create_offer(None).await?;
        self.pc.set_local_description(offer.clone()).await?;
        Ok(serde_json::to_value(&offer)?)
    }

    async fn accept_offer(&self, offer: Value) -> Result<Value, SessionError> {
        let offer = decode_description(offer, RTCSdpType::Offer)?;
        self.pc.set_remote_description(offer).await?;

        let answer = self.pc.create_answer(None).await?;
        self.pc.set_local_description(answer.clone()).await?;
        Ok(serde_json::to_value(&answer)?)
    }

    async fn apply_answer(&self, answer: Value) -> Result<(), SessionError> {
        let answer = decode_description(answer, RTCSdpType::Answer)?;
        self.pc.set_remote_description(answer).await?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: Value) -> Result<(), SessionError> {
        let candidate: RTCIceCandidateInit = serde_json::from_value(candidate)
            .map_err(|e| SessionError::MalformedSignal(e.to_string()))?;
        self.pc.add_ice_candidate(candidate).await?;
        Ok(())
    }

    async fn close(&self) {
        if let Err(e) = self.pc.close().await {
            warn!("Failed to close peer connection: {}", e);
        }
    }
}
