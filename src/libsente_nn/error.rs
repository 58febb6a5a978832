// Copyright 2026 The sente authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;
use std::io;

/// Why a weights file could not be used.
#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    WrongVersion(String),
    WrongLineCount(usize),
    MalformedLine(usize),
    WrongShape { line: usize, expected: usize, found: usize }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(reason) => write!(f, "could not read weights file: {}", reason),
            Error::WrongVersion(found) => write!(f, "weights file is the wrong version: {}", found),
            Error::WrongLineCount(count) => write!(f, "inconsistent number of lines in the weights file: {}", count),
            Error::MalformedLine(line) => write!(f, "weights file line {} is not whitespace-separated floats", line),
            Error::WrongShape { line, expected, found } => {
                write!(f, "weights file line {} has {} values, expected {}", line, found, expected)
            }
        }
    }
}

impl From<io::Error> for Error {
    fn from(reason: io::Error) -> Error {
        Error::Io(reason)
    }
}
