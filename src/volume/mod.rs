//! Multi-volume archive support.
//!
//! A RAR archive may be split across several files. Each volume is a complete
//! block stream of its own (marker, archive block, file blocks, end block);
//! a file too large for one volume is stored as several file blocks, one per
//! volume, flagged as continuing into the next or from the previous one.
//!
//! # Chain Resolution
//!
//! Only the volume passed to [`Archive::open`](crate::Archive::open) is
//! opened eagerly. When the merged listing is first requested, the chain is
//! followed while the last volume is marked as a volume and its end block
//! announces a successor:
//!
//! 1. derive the successor's file name with [`next_volume_path`]
//! 2. open it, check its signature, and scan it
//! 3. append it to the chain and repeat
//!
//! # Volume Naming Convention
//!
//! Two schemes are in use:
//! - `archive.part1.rar`, `archive.part2.rar`, ... (RAR 3.0 and later)
//! - `archive.rar`, `archive.r00`, `archive.r01`, ... (older releases)
//!
//! The volume number keeps its zero padding (`part09` is followed by
//! `part10`, `r09` by `r10`).

mod chain;
mod naming;

pub use chain::{DEFAULT_MAX_VOLUMES, Volume, VolumeChain, Volumes};
pub use naming::next_volume_path;
