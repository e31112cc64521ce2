//! A small feed-forward neural-network trainer/predictor for tabular data.
//!
//! `tabmlp` fits a fixed stack of dense layers to numeric matrices with
//! mini-batch gradient descent, and later applies the fitted network to new
//! rows. The network topology is known in full before training starts; there
//! are no computation graphs, no autodiff, no GPU.
//!
//! # Design goals
//!
//! - Predictable performance: forward/backward buffers ([`BatchScratch`],
//!   [`Deltas`]) are allocated once and reused across mini-batches; the dense
//!   matrix product is one GEMM call per layer per batch.
//! - Clear contracts: shapes are explicit and validated at the API boundary.
//! - A private binary weight format whose shape check makes silently applying
//!   mismatched weights impossible.
//!
//! # Panics vs `Result`
//!
//! This crate intentionally exposes two layers of API:
//!
//! - Low-level hot path (panics on misuse):
//!   [`Network::forward_batch`], [`Network::backward_batch`].
//!   Shape mismatches are treated as programmer error and will panic via
//!   `assert!` with a message naming the expected and actual dimensions.
//! - High-level convenience APIs (shape-checked, return [`Result`]):
//!   [`Network::fit`], [`Network::predict`], [`Network::predict_into`],
//!   [`Network::evaluate`], [`Network::save_weights`],
//!   [`Network::load_weights`].
//!
//! # Data layout and shapes
//!
//! - Scalars are `f64`.
//! - All matrices are flat row-major buffers: inputs `(rows, input_dim)`,
//!   targets `(rows, output_dim)`, layer weights `(in_dim, out_dim)`.
//! - Per-layer pre-activation (`z`) and post-activation (`out`) batch buffers
//!   live in [`BatchScratch`], sized to the largest batch used.
//!
//! # Quick start
//!
//! ```rust
//! use tabmlp::{Activation, Dataset, FitConfig, Loss, NetworkBuilder, Shuffle};
//!
//! # fn main() -> tabmlp::Result<()> {
//! let xs = vec![vec![1.0], vec![2.0], vec![3.0], vec![4.0]];
//! let ys = vec![vec![2.0], vec![4.0], vec![6.0], vec![8.0]];
//! let train = Dataset::from_rows(&xs, &ys)?;
//!
//! let mut net = NetworkBuilder::new(1)?
//!     .add_layer(4, Activation::Tanh)?
//!     .add_layer(1, Activation::Linear)?
//!     .build_with_seed(0)?;
//!
//! let report = net.fit(
//!     &train,
//!     FitConfig {
//!         epochs: 50,
//!         batch_size: 2,
//!         lr: 1e-2,
//!         shuffle: Shuffle::Seeded(0),
//!         loss: Loss::Square,
//!     },
//! )?;
//! assert!(report.final_loss.is_finite());
//!
//! let preds = net.predict(train.inputs())?;
//! assert_eq!(preds.len(), 4);
//! # Ok(())
//! # }
//! ```
//!
//! # Weight persistence
//!
//! ```rust,no_run
//! use tabmlp::{Activation, NetworkBuilder};
//!
//! # fn main() -> tabmlp::Result<()> {
//! let trained = NetworkBuilder::from_sizes(&[3, 8, 1], &[Activation::ReLU, Activation::Sigmoid])?
//!     .build_with_seed(0)?;
//! trained.save_weights("model.weights")?;
//!
//! // A predictor run rebuilds the same shapes zero-filled, then loads.
//! let mut net = NetworkBuilder::from_sizes(&[3, 8, 1], &[Activation::ReLU, Activation::Sigmoid])?
//!     .build_zeroed()?;
//! net.load_weights("model.weights")?;
//! # Ok(())
//! # }
//! ```

pub mod activation;
pub mod builder;
pub mod codec;
pub mod data;
pub mod error;
pub mod layer;
pub mod loss;
pub(crate) mod matmul;
pub mod network;
pub mod train;

pub use activation::Activation;
pub use builder::NetworkBuilder;
pub use data::{Dataset, Inputs};
pub use error::{Error, Result};
pub use layer::Layer;
pub use loss::Loss;
pub use network::{BatchScratch, Deltas, Network};
pub use train::{FitConfig, FitReport, Shuffle};
