//! Binary weight persistence.
//!
//! The on-disk layout is a flat, untagged dump of the parameter set, all fields
//! little-endian:
//!
//! ```text
//! network_size: u64
//! per layer, in order:
//!   in_dim:  u64
//!   out_dim: u64
//!   weights: f64[in_dim * out_dim]   (row-major)
//!   biases:  f64[out_dim]
//! ```
//!
//! There is no version field; the per-layer shape check against the live
//! network is the compatibility check. A reader must already hold a network
//! with the exact layer shapes the file was written from (e.g. built with
//! [`crate::NetworkBuilder::build_zeroed`]); any drift in layer count or any
//! single dimension is a hard [`crate::Error::WeightMismatch`], never a partial
//! or truncated load.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::{Error, Network, Result};

impl Network {
    /// Write the full parameter set to `writer`.
    pub fn write_weights<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_u64(writer, self.num_layers() as u64)?;
        for layer in self.layers() {
            write_u64(writer, layer.in_dim() as u64)?;
            write_u64(writer, layer.out_dim() as u64)?;
            for &w in layer.weights() {
                writer.write_all(&w.to_le_bytes())?;
            }
            for &b in layer.biases() {
                writer.write_all(&b.to_le_bytes())?;
            }
        }
        Ok(())
    }

    /// Read a parameter set from `reader` into this network.
    ///
    /// The network's layer shapes must already match the file exactly; the
    /// header of every layer is validated before that layer's parameters are
    /// overwritten. On error the network's contents are unspecified but its
    /// shapes are untouched.
    pub fn read_weights<R: Read>(&mut self, reader: &mut R) -> Result<()> {
        let stored_size = read_u64(reader)?;
        if stored_size != self.num_layers() as u64 {
            return Err(Error::WeightMismatch(format!(
                "stored network has {stored_size} layers, live network has {}",
                self.num_layers()
            )));
        }

        for idx in 0..self.num_layers() {
            let stored_in = read_u64(reader)?;
            let stored_out = read_u64(reader)?;
            let layer = self.layer_mut(idx).expect("idx < num_layers");

            if stored_in != layer.in_dim() as u64 {
                return Err(Error::WeightMismatch(format!(
                    "layer {idx}: stored in_dim {stored_in} does not match live in_dim {}",
                    layer.in_dim()
                )));
            }
            if stored_out != layer.out_dim() as u64 {
                return Err(Error::WeightMismatch(format!(
                    "layer {idx}: stored out_dim {stored_out} does not match live out_dim {}",
                    layer.out_dim()
                )));
            }

            for w in layer.weights_mut() {
                *w = read_f64(reader)?;
            }
            for b in layer.biases_mut() {
                *b = read_f64(reader)?;
            }
        }

        Ok(())
    }

    /// Save the parameter set to a file.
    pub fn save_weights<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_weights(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Load a parameter set from a file into this already-shaped network.
    pub fn load_weights<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        self.read_weights(&mut reader)
    }
}

fn write_u64<W: Write>(writer: &mut W, value: u64) -> Result<()> {
    writer.write_all(&value.to_le_bytes())?;
    Ok(())
}

fn read_u64<R: Read>(reader: &mut R) -> Result<u64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

fn read_f64<R: Read>(reader: &mut R) -> Result<f64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(f64::from_le_bytes(buf))
}
