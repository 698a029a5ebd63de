//! epoca — single-epoch training and validation runner for multi-output models
//!
//! The crate owns one thing: the loop that takes a model, a data source, a
//! device, an optimizer, and a criterion through one epoch, returning the
//! mean loss, optionally cached predictions, and epoch-level metrics
//! (classification accuracy and coordinate RMSE). The model, optimizer, and
//! criterion are collaborators behind traits; whatever differentiation
//! machinery they use stays on their side of the seam.
//!
//! # Example
//!
//! ```no_run
//! use epoca::train::{CompositeCriterion, CrossEntropyLoss, EpochConfig, EpochRunner, MseLoss, TargetRef};
//! use epoca::{Device, Sgd};
//!
//! let criterion = CompositeCriterion::new()
//!     .with_term(1.0, CrossEntropyLoss::new("grp", TargetRef::cols("actions", 3, 7)))
//!     .with_term(1.0, MseLoss::new("pos", TargetRef::cols("actions", 0, 3)));
//! let mut optimizer = Sgd::new(0.001, 0.9);
//! let runner = EpochRunner::new(EpochConfig::default());
//!
//! // let report = runner.run(&mut model, batches, Device::Cpu, &mut optimizer, &criterion)?;
//! // println!("mean loss {:.4}, accuracy {:.4}", report.mean_loss, report.metrics.accuracy);
//! ```

pub mod data;
pub mod device;
pub mod error;
pub mod module;
pub mod optim;
pub mod tensor;
pub mod train;

pub use data::{Batch, TensorMap};
pub use device::Device;
pub use error::{EpochError, Result};
pub use module::Module;
pub use optim::{Optimizer, Sgd};
pub use tensor::Tensor;
pub use train::{EpochConfig, EpochMetrics, EpochReport, EpochRunner};
