mod sync_channel;
mod track_channel;
#[cfg(unix)]
mod unix_channel;

pub use sync_channel::SyncChannel;
pub use track_channel::TrackChannel;

#[cfg(unix)]
pub use unix_channel::{
    track_unix_channel_pair, try_unix_channel_pair, unix_channel_pair, TrackUnixChannel,
    UnixChannel,
};

use crate::errors::Error;
use serde::{de::DeserializeOwned, Serialize};
use std::{
    cell::RefCell,
    io::{Read, Result, Write},
    rc::Rc,
};

/// Largest message body `MessageChannel::receive_message` will allocate for.
pub const MAX_MESSAGE_LEN: usize = 1 << 26;

/// A trait for managing I/O. `AbstractChannel`s are clonable, and provide basic
/// read/write capabilities for common types.
pub trait AbstractChannel {
    /// Read a slice of `u8`s from the channel.
    fn read_bytes(&mut self, bytes: &mut [u8]) -> Result<()>;
    /// Write a slice of `u8`s to the channel.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()>;
    /// Flush the channel.
    fn flush(&mut self) -> Result<()>;
    /// Clone the channel.
    fn clone(&self) -> Self
    where
        Self: Sized;
    /// Read `nbytes` from the channel, and return it as a `Vec`.
    fn read_vec(&mut self, nbytes: usize) -> Result<Vec<u8>> {
        let mut data = vec![0; nbytes];
        self.read_bytes(&mut data)?;
        Ok(data)
    }

    /// Write a `u8` to the channel.
    #[inline(always)]
    fn write_u8(&mut self, s: u8) -> Result<()> {
        self.write_bytes(&[s])
    }

    /// Read a `u8` from the channel.
    #[inline(always)]
    fn read_u8(&mut self) -> Result<u8> {
        let mut data = [0];
        self.read_bytes(&mut data)?;
        Ok(data[0])
    }

    /// Write a `u64` to the channel.
    #[inline(always)]
    fn write_u64(&mut self, s: u64) -> Result<()> {
        self.write_bytes(&s.to_le_bytes())
    }

    /// Read a `u64` from the channel.
    #[inline(always)]
    fn read_u64(&mut self) -> Result<u64> {
        let mut data = [0u8; 8];
        self.read_bytes(&mut data)?;
        Ok(u64::from_le_bytes(data))
    }

    /// Write a `usize` to the channel.
    #[inline(always)]
    fn write_usize(&mut self, s: usize) -> Result<()> {
        self.write_u64(s as u64)
    }

    /// Read a `usize` from the channel.
    #[inline(always)]
    fn read_usize(&mut self) -> Result<usize> {
        let x = self.read_u64()?;
        usize::try_from(x).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

/// A protocol message that can travel over a [`MessageChannel`].
///
/// Every message type carries a distinct one-byte tag so that the receiving
/// side can reject a message arriving out of order before decoding it.
/// Tags `0x10..0x20` are used by this crate, `0x20..0x30` by Sigma protocols
/// and `0x30..0x40` by oblivious transfer.
pub trait WireMessage: Serialize + DeserializeOwned {
    /// Tag written ahead of the message body.
    const TAG: u8;
    /// Name used in error reports.
    const NAME: &'static str;
}

/// Typed, tagged message exchange on top of an [`AbstractChannel`].
pub trait MessageChannel: AbstractChannel {
    /// Frame `msg` as `tag || length || body`, write it, and flush.
    fn send_message<M: WireMessage>(&mut self, msg: &M) -> std::result::Result<(), Error> {
        let body = bincode::serialize(msg)?;
        let mut frame = Vec::with_capacity(body.len() + 9);
        frame.push(M::TAG);
        frame.extend_from_slice(&(body.len() as u64).to_le_bytes());
        frame.extend_from_slice(&body);
        self.write_bytes(&frame)?;
        self.flush()?;
        Ok(())
    }

    /// Read the next message, failing if it is not an `M`.
    fn receive_message<M: WireMessage>(&mut self) -> std::result::Result<M, Error> {
        let tag = self.read_u8()?;
        if tag != M::TAG {
            return Err(Error::UnexpectedMessage {
                expected: M::NAME,
                tag,
            });
        }
        let len = self.read_usize()?;
        if len > MAX_MESSAGE_LEN {
            return Err(Error::MessageTooLarge(len));
        }
        let body = self.read_vec(len)?;
        Ok(bincode::deserialize(&body)?)
    }
}

impl<C: AbstractChannel + ?Sized> MessageChannel for C {}

/// A standard read/write channel that implements `AbstractChannel`.
pub struct Channel<R, W> {
    reader: Rc<RefCell<R>>,
    writer: Rc<RefCell<W>>,
}

impl<R: Read, W: Write> Channel<R, W> {
    /// Make a new `Channel` from a `reader` and a `writer`.
    pub fn new(reader: R, writer: W) -> Self {
        let reader = Rc::new(RefCell::new(reader));
        let writer = Rc::new(RefCell::new(writer));
        Self { reader, writer }
    }
}

impl<R: Read, W: Write> AbstractChannel for Channel<R, W> {
    #[inline(always)]
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.borrow_mut().write_all(bytes)?;
        Ok(())
    }

    #[inline(always)]
    fn read_bytes(&mut self, bytes: &mut [u8]) -> Result<()> {
        self.reader.borrow_mut().read_exact(bytes)
    }

    #[inline(always)]
    fn flush(&mut self) -> Result<()> {
        self.writer.borrow_mut().flush()
    }

    #[inline(always)]
    fn clone(&self) -> Self {
        Self {
            reader: self.reader.clone(),
            writer: self.writer.clone(),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::{
        io::{BufReader, BufWriter},
        os::unix::net::UnixStream,
    };

    #[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
    struct Ping {
        payload: Vec<u8>,
        round: u64,
    }

    impl WireMessage for Ping {
        const TAG: u8 = 0x1e;
        const NAME: &'static str = "Ping";
    }

    #[derive(Serialize, Deserialize, Debug)]
    struct Pong;

    impl WireMessage for Pong {
        const TAG: u8 = 0x1f;
        const NAME: &'static str = "Pong";
    }

    #[test]
    fn message_round_trip() {
        let (sender, receiver) = UnixStream::pair().unwrap();
        let handle = std::thread::spawn(move || {
            let reader = BufReader::new(sender.try_clone().unwrap());
            let writer = BufWriter::new(sender);
            let mut channel = Channel::new(reader, writer);
            let msg = Ping {
                payload: b"hello".to_vec(),
                round: 7,
            };
            channel.send_message(&msg).unwrap();
        });
        let reader = BufReader::new(receiver.try_clone().unwrap());
        let writer = BufWriter::new(receiver);
        let mut channel = Channel::new(reader, writer);
        let msg: Ping = channel.receive_message().unwrap();
        assert_eq!(
            msg,
            Ping {
                payload: b"hello".to_vec(),
                round: 7
            }
        );
        handle.join().unwrap();
    }

    #[test]
    fn unexpected_tag_is_rejected() {
        let (mut a, mut b) = unix_channel_pair();
        let handle = std::thread::spawn(move || {
            a.send_message(&Pong).unwrap();
        });
        let err = b.receive_message::<Ping>().unwrap_err();
        assert!(err
            .to_string()
            .contains("received message should be an instance of Ping"));
        match err {
            Error::UnexpectedMessage { expected, tag } => {
                assert_eq!(expected, "Ping");
                assert_eq!(tag, Pong::TAG);
            }
            e => panic!("unexpected error {}", e),
        }
        handle.join().unwrap();
    }

    #[test]
    fn oversized_message_is_refused() {
        let (mut a, mut b) = unix_channel_pair();
        let handle = std::thread::spawn(move || {
            a.write_u8(Ping::TAG).unwrap();
            a.write_usize(MAX_MESSAGE_LEN + 1).unwrap();
            a.flush().unwrap();
        });
        assert!(matches!(
            b.receive_message::<Ping>(),
            Err(Error::MessageTooLarge(_))
        ));
        handle.join().unwrap();
    }
}
