use crate::{SyncChannel, TrackChannel};
use std::{
    io::{BufReader, BufWriter},
    os::unix::net::UnixStream,
};

/// A SyncChannel which uses UnixStreams.
pub type UnixChannel = SyncChannel<BufReader<UnixStream>, BufWriter<UnixStream>>;

/// A TrackChannel which uses UnixStreams.
pub type TrackUnixChannel = TrackChannel<UnixChannel>;

fn unix_channel(stream: UnixStream) -> std::io::Result<UnixChannel> {
    Ok(SyncChannel::new(
        BufReader::new(stream.try_clone()?),
        BufWriter::new(stream),
    ))
}

/// Convenience function to create a pair of connected UnixChannels for local
/// two-party runs.
pub fn unix_channel_pair() -> (UnixChannel, UnixChannel) {
    try_unix_channel_pair().expect("failed to create a UnixStream pair")
}

/// Like [`unix_channel_pair`], but reports socket failures instead of
/// panicking.
pub fn try_unix_channel_pair() -> std::io::Result<(UnixChannel, UnixChannel)> {
    let (tx, rx) = UnixStream::pair()?;
    Ok((unix_channel(tx)?, unix_channel(rx)?))
}

/// Convenience function to create a pair of TrackUnixChannels for local
/// two-party runs.
pub fn track_unix_channel_pair() -> (TrackUnixChannel, TrackUnixChannel) {
    let (sender, receiver) = unix_channel_pair();
    (TrackChannel::new(sender), TrackChannel::new(receiver))
}
