use crate::engine::{
    ContextEvent, ContextEventSender, ContextFactory, ContextKind, PeerContext, PeerState,
    RemoteTrack,
};
use crate::{ClientConfig, ClientError};
use async_trait::async_trait;
use duet_core::{IceCandidate, SdpKind};
use std::sync::Arc;
use tracing::{debug, info, warn};
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::api::{API, APIBuilder};
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::RTCRtpTransceiverInit;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::rtp_transceiver::rtp_transceiver_direction::RTCRtpTransceiverDirection;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_remote::TrackRemote;

pub type LocalTrack = Arc<dyn TrackLocal + Send + Sync>;

/// Builds webrtc-rs peer connections sharing one media engine setup.
///
/// Local tracks are produced by the embedding application (capture lives
/// outside this crate) and are attached to every Offerer.
pub struct WebRtcContextFactory {
    api: API,
    rtc_config: RTCConfiguration,
    local_tracks: Vec<LocalTrack>,
}

impl WebRtcContextFactory {
    pub fn new(config: &ClientConfig, local_tracks: Vec<LocalTrack>) -> Result<Self, ClientError> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: config
                .ice_servers
                .iter()
                .map(|server| RTCIceServer {
                    urls: server.urls.clone(),
                    username: server.username.clone().unwrap_or_default(),
                    credential: server.credential.clone().unwrap_or_default(),
                })
                .collect(),
            ..Default::default()
        };

        Ok(Self {
            api,
            rtc_config,
            local_tracks,
        })
    }
}

#[async_trait]
impl ContextFactory for WebRtcContextFactory {
    async fn create(
        &self,
        kind: ContextKind,
        events: ContextEventSender,
    ) -> Result<Box<dyn PeerContext>, ClientError> {
        let peer_connection = Arc::new(
            self.api
                .new_peer_connection(self.rtc_config.clone())
                .await?,
        );

        let state_events = events.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let events = state_events.clone();

                Box::pin(async move {
                    debug!("{:?} connection state: {:?}", events.kind(), s);
                    let state = match s {
                        RTCPeerConnectionState::Connecting => PeerState::Connecting,
                        RTCPeerConnectionState::Connected => PeerState::Connected,
                        RTCPeerConnectionState::Disconnected => PeerState::Disconnected,
                        RTCPeerConnectionState::Failed => PeerState::Failed,
                        RTCPeerConnectionState::Closed => PeerState::Closed,
                        _ => PeerState::New,
                    };
                    events.emit(ContextEvent::StateChanged(state));
                })
            },
        ));

        let ice_events = events.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let events = ice_events.clone();

            Box::pin(async move {
                let Some(candidate) = c else { return };
                match candidate.to_json() {
                    Ok(init) => {
                        events.emit(ContextEvent::LocalCandidate(IceCandidate {
                            candidate: init.candidate,
                            sdp_mid: init.sdp_mid,
                            sdp_m_line_index: init.sdp_mline_index,
                            username_fragment: init.username_fragment,
                        }));
                    }
                    Err(e) => warn!("Cannot serialize local candidate: {}", e),
                }
            })
        }));

        let track_events = events.clone();
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let events = track_events.clone();

                Box::pin(async move {
                    let remote = RemoteTrack {
                        id: track.id(),
                        stream_id: track.stream_id(),
                        kind: track.kind().to_string(),
                    };
                    info!("Remote {} track {} arrived", remote.kind, remote.id);
                    events.emit(ContextEvent::RemoteTrack(remote));
                })
            },
        ));

        let local_tracks = match kind {
            ContextKind::Offerer => self.local_tracks.clone(),
            ContextKind::Answerer => Vec::new(),
        };

        Ok(Box::new(WebRtcContext {
            kind,
            peer_connection,
            local_tracks,
        }))
    }
}

pub struct WebRtcContext {
    kind: ContextKind,
    peer_connection: Arc<RTCPeerConnection>,
    local_tracks: Vec<LocalTrack>,
}

#[async_trait]
impl PeerContext for WebRtcContext {
    async fn attach_local_media(&self) -> Result<(), ClientError> {
        if self.local_tracks.is_empty() {
            // Nothing to send; still ask for the peer's media so the offer
            // carries a media section.
            for codec in [RTPCodecType::Audio, RTPCodecType::Video] {
                self.peer_connection
                    .add_transceiver_from_kind(
                        codec,
                        Some(RTCRtpTransceiverInit {
                            direction: RTCRtpTransceiverDirection::Recvonly,
                            send_encodings: vec![],
                        }),
                    )
                    .await?;
            }
            return Ok(());
        }

        for track in &self.local_tracks {
            self.peer_connection.add_track(Arc::clone(track)).await?;
        }
        debug!(
            "{:?} attached {} local tracks",
            self.kind,
            self.local_tracks.len()
        );
        Ok(())
    }

    async fn create_offer(&self) -> Result<String, ClientError> {
        let offer = self.peer_connection.create_offer(None).await?;
        self.peer_connection
            .set_local_description(offer.clone())
            .await?;
        Ok(offer.sdp)
    }

    async fn create_answer(&self) -> Result<String, ClientError> {
        let answer = self.peer_connection.create_answer(None).await?;
        self.peer_connection
            .set_local_description(answer.clone())
            .await?;
        Ok(answer.sdp)
    }

    async fn set_remote_description(&self, kind: SdpKind, sdp: String) -> Result<(), ClientError> {
        let desc = match kind {
            SdpKind::Offer => RTCSessionDescription::offer(sdp)?,
            SdpKind::Answer => RTCSessionDescription::answer(sdp)?,
        };
        self.peer_connection.set_remote_description(desc).await?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), ClientError> {
        self.peer_connection
            .add_ice_candidate(RTCIceCandidateInit {
                candidate: candidate.candidate,
                sdp_mid: candidate.sdp_mid,
                sdp_mline_index: candidate.sdp_m_line_index,
                username_fragment: candidate.username_fragment,
            })
            .await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), ClientError> {
        self.peer_connection.close().await?;
        Ok(())
    }
}
