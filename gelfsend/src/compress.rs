/*!
Serialization and compression of GELF packets.

GELF inputs detect the compression of a datagram from its first two bytes,
so any of the supported formats can be sent without further framing.
*/

use std::{
    io::{Read, Write},
    str::FromStr,
};

use anyhow::Context;

use bytes::Bytes;

use libflate::{gzip, zlib};

use crate::{packet::Packet, Error};

metrics! {
    ok,
    err
}

/**
Configuration for compression.
*/
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub compression: Compression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    Gzip,
    Zlib,
    None,
}

impl Default for Compression {
    fn default() -> Self {
        Compression::Gzip
    }
}

impl FromStr for Compression {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gzip" => Ok(Compression::Gzip),
            "zlib" => Ok(Compression::Zlib),
            "none" => Ok(Compression::None),
            _ => Err(anyhow!("unrecognized compression `{}`", s)),
        }
    }
}

impl Compression {
    const MAGIC_GZIP: [u8; 2] = [0x1f, 0x8b];
    const MAGIC_ZLIB: u8 = 0x78;

    /**
    Detect the compression of a payload from its leading bytes.
    */
    pub fn detect(src: &[u8]) -> Compression {
        match src {
            [a, b, ..] if [*a, *b] == Self::MAGIC_GZIP => Compression::Gzip,
            [a, b, ..]
                if *a == Self::MAGIC_ZLIB
                    && ((u16::from(*a) << 8) + u16::from(*b)) % 31 == 0 =>
            {
                Compression::Zlib
            }
            _ => Compression::None,
        }
    }
}

/**
Compresses packets into datagram payloads.
*/
#[derive(Debug, Clone)]
pub struct Compressor {
    compression: Compression,
}

impl Compressor {
    pub fn new(config: Config) -> Self {
        Compressor {
            compression: config.compression,
        }
    }

    /**
    Serialize a packet as JSON and compress it.
    */
    pub fn compress(&self, packet: &Packet) -> Result<Bytes, Error> {
        match self.encode(packet) {
            Ok(compressed) => {
                increment!(compress.ok);
                Ok(compressed)
            }
            Err(err) => {
                increment!(compress.err);
                Err(err)
            }
        }
    }

    fn encode(&self, packet: &Packet) -> Result<Bytes, Error> {
        let json = serde_json::to_vec(packet).context("failed to serialize GELF packet")?;

        let compressed = match self.compression {
            Compression::Gzip => {
                let mut encoder = gzip::Encoder::new(Vec::with_capacity(json.len()))?;
                encoder.write_all(&json)?;

                encoder
                    .finish()
                    .into_result()
                    .context("failed to finish gzip encoding")?
            }
            Compression::Zlib => {
                let mut encoder = zlib::Encoder::new(Vec::with_capacity(json.len()))?;
                encoder.write_all(&json)?;

                encoder
                    .finish()
                    .into_result()
                    .context("failed to finish zlib encoding")?
            }
            Compression::None => json,
        };

        Ok(Bytes::from(compressed))
    }
}

/**
Decompress a payload, detecting its compression.
*/
pub fn decompress(src: &[u8]) -> Result<Vec<u8>, Error> {
    let mut decompressed = Vec::new();

    match Compression::detect(src) {
        Compression::Gzip => {
            gzip::Decoder::new(src)?.read_to_end(&mut decompressed)?;
        }
        Compression::Zlib => {
            zlib::Decoder::new(src)?.read_to_end(&mut decompressed)?;
        }
        Compression::None => decompressed.extend_from_slice(src),
    }

    Ok(decompressed)
}
