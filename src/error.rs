// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The error type shared by the engine and the command line tool.
//! The evaluator and the palette are total functions and never fail;
//! everything here is either a configuration mistake caught up front
//! or a resource problem encountered while running a compute pass.

use std::io;

/// Everything that can go wrong while setting up or running a pass.
#[derive(Debug, Fail)]
pub enum Error {
    /// The output raster must have at least one row and one column.
    #[fail(display = "image dimensions must be non-zero, got {}x{}", width, height)]
    InvalidDimensions {
        /// Requested width in pixels
        width: u32,
        /// Requested height in pixels
        height: u32,
    },

    /// A pass needs at least one worker thread.
    #[fail(display = "worker count must be at least 1")]
    NoWorkers,

    /// The operating system refused to give us another thread.  The
    /// pass is abandoned and the previously published frame stays.
    #[fail(display = "could not spawn row worker {}: {}", worker, cause)]
    WorkerSpawn {
        /// Index of the worker that failed to start
        worker: usize,
        /// What the OS told us
        #[cause]
        cause: io::Error,
    },

    /// A row worker panicked before finishing its share of the frame.
    #[fail(display = "a row worker panicked during the compute pass")]
    WorkerPanicked,

    /// Writing the finished frame somewhere failed.
    #[fail(display = "could not write image: {}", _0)]
    Output(#[cause] io::Error),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Output(err)
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = ::std::result::Result<T, Error>;
