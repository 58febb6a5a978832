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

#[macro_use] extern crate lazy_static;

mod board;
mod color;
mod game_state;
mod ko_state;
pub mod features;
pub mod score;
pub mod symmetry;
pub mod time_control;
pub mod zobrist;
mod vertex;

pub use self::board::*;
pub use self::color::*;
pub use self::game_state::*;
pub use self::ko_state::*;
pub use self::vertex::*;
