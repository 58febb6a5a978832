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

//! The text protocol front end. One command per line, an optional
//! numeric id, `#` comments stripped; successes answer `=[id] ...`,
//! failures `?[id] message`, each terminated by a blank line.

use std::io::{self, BufRead, Write};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use log::warn;

use sente_go::{score, Color, GameState, Vertex, MAXBOARDSIZE};
use sente_mcts::predict::Predictor;
use sente_mcts::time_control::{ByoYomi, Earliest, RolloutLimit};
use sente_mcts::tree::Node;
use sente_mcts::search;
use sente_utils::config;

const KNOWN_COMMANDS: &[&str] = &[
    "protocol_version", "name", "version", "known_command", "list_commands",
    "quit", "boardsize", "clear_board", "komi", "play", "genmove", "undo",
    "time_settings", "time_left", "final_score", "showboard"
];

enum Response {
    Success(String),
    Failure(String),
    Quit
}

pub struct Gtp {
    server: Arc<dyn Predictor>,
    game: GameState,

    /// The subtree kept from the previous search, rooted at the position
    /// after the move actually played.
    tree: Option<Node>
}

impl Gtp {
    pub fn new(server: Arc<dyn Predictor>) -> Gtp {
        Gtp {
            server,
            game: GameState::new(MAXBOARDSIZE),
            tree: None
        }
    }

    /// Serves the protocol until `quit` or end of input. An unreadable
    /// input stream is a framing error.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<(), io::Error> {
        for line in input.lines() {
            let line = line?;

            let line = match line.find('#') {
                Some(index) => &line[..index],
                None => &line[..]
            };
            let line = line.trim();

            if line.is_empty() {
                continue;
            }

            let (id, command) = split_id(line);
            let id = id.map(|id| id.to_string()).unwrap_or_default();

            match self.dispatch(command) {
                Response::Success(result) => {
                    let _ = write!(output, "={} {}\n\n", id, result);
                },
                Response::Failure(message) => {
                    let _ = write!(output, "?{} {}\n\n", id, message);
                },
                Response::Quit => {
                    let _ = write!(output, "={} \n\n", id);
                    break;
                }
            }

            let _ = output.flush();
        }

        Ok(())
    }

    fn dispatch(&mut self, command: &str) -> Response {
        let mut tokens = command.split_whitespace();
        let name = match tokens.next() {
            Some(name) => name,
            None => return Response::Failure("syntax error".into())
        };
        let args: Vec<&str> = tokens.collect();

        match name {
            "protocol_version" => Response::Success("2".into()),
            "name" => Response::Success("Sente".into()),
            "version" => Response::Success(env!("CARGO_PKG_VERSION").into()),
            "known_command" => {
                let known = args.get(0)
                    .map(|cmd| KNOWN_COMMANDS.contains(cmd))
                    .unwrap_or(false);

                Response::Success(known.to_string())
            },
            "list_commands" => Response::Success(KNOWN_COMMANDS.join("\n")),
            "quit" => Response::Quit,
            "boardsize" => self.cmd_boardsize(&args),
            "clear_board" => {
                self.game = GameState::new(self.game.size());
                self.tree = None;
                Response::Success("".into())
            },
            "komi" => match args.get(0).and_then(|s| s.parse::<f32>().ok()) {
                Some(komi) => {
                    self.game.set_komi(komi);
                    Response::Success("".into())
                },
                None => Response::Failure("syntax error".into())
            },
            "play" => self.cmd_play(&args),
            "genmove" => self.cmd_genmove(&args),
            "undo" => {
                if self.game.undo_move() {
                    self.tree = None;
                    Response::Success("".into())
                } else {
                    Response::Failure("cannot undo".into())
                }
            },
            "time_settings" => self.cmd_time_settings(&args),
            "time_left" => self.cmd_time_left(&args),
            "final_score" => {
                Response::Success(score::final_score(self.game.board(), self.game.komi()))
            },
            "showboard" => Response::Success(format!("\n{}", self.game.board())),
            _ => Response::Failure("unknown command".into())
        }
    }

    fn cmd_boardsize(&mut self, args: &[&str]) -> Response {
        match args.get(0).and_then(|s| s.parse::<usize>().ok()) {
            Some(size) if size >= 2 && size <= MAXBOARDSIZE => {
                self.game = GameState::new(size);
                self.tree = None;
                Response::Success("".into())
            },
            Some(_) => Response::Failure("unacceptable size".into()),
            None => Response::Failure("syntax error".into())
        }
    }

    fn cmd_play(&mut self, args: &[&str]) -> Response {
        let color = args.get(0).and_then(|s| Color::from_str(s).ok());
        let vertex = args.get(1).and_then(|s| Vertex::from_text(self.game.size(), s));

        let (color, vertex) = match (color, vertex) {
            (Some(color), Some(vertex)) => (color, vertex),
            _ => return Response::Failure("syntax error".into())
        };

        match self.game.play_move(color, vertex) {
            Ok(_) => {
                // keep the subtree under the played move, if we have one
                self.tree = self.tree.take().and_then(|tree| {
                    if tree.to_move() == color {
                        tree.forward(vertex)
                    } else {
                        None
                    }
                });

                Response::Success("".into())
            },
            Err(reason) => Response::Failure(format!("{}", reason))
        }
    }

    fn cmd_genmove(&mut self, args: &[&str]) -> Response {
        let color = match args.get(0).and_then(|s| Color::from_str(s).ok()) {
            Some(color) => color,
            None => return Response::Failure("syntax error".into())
        };

        self.game.set_to_move(color);
        self.game.start_clock(color);

        let allocation = self.game.time_control().max_time_for_move(color);
        let strategy = Earliest(
            RolloutLimit::new(*config::NUM_PLAYOUTS),
            ByoYomi::new(allocation)
        );
        let result = search::think(
            self.server.clone(),
            &self.game,
            Box::new(strategy),
            self.tree.take()
        );

        self.game.stop_clock(color);

        let (vertex, tree) = match result {
            Some((_, vertex, tree)) => (vertex, Some(tree)),
            None => {
                warn!("search failed, passing");
                (Vertex::Pass, None)
            }
        };

        if self.game.play_move(color, vertex).is_err() {
            // the search never proposes an illegal move, but pass is
            // always safe
            let _ = self.game.play_move(color, Vertex::Pass);
            return Response::Success("pass".into());
        }

        self.tree = match vertex {
            Vertex::Resign => None,
            vertex => tree.and_then(|tree| tree.forward(vertex))
        };

        Response::Success(vertex.to_text(self.game.size()))
    }

    fn cmd_time_settings(&mut self, args: &[&str]) -> Response {
        let main = args.get(0).and_then(|s| s.parse::<u64>().ok());
        let byo = args.get(1).and_then(|s| s.parse::<u64>().ok());
        let stones = args.get(2).and_then(|s| s.parse::<usize>().ok());

        match (main, byo, stones) {
            (Some(main), Some(byo), Some(stones)) => {
                self.game.set_time_control(
                    Duration::from_secs(main),
                    Duration::from_secs(byo),
                    stones,
                    1
                );
                Response::Success("".into())
            },
            _ => Response::Failure("syntax error".into())
        }
    }

    fn cmd_time_left(&mut self, args: &[&str]) -> Response {
        let color = args.get(0).and_then(|s| Color::from_str(s).ok());
        let time = args.get(1).and_then(|s| s.parse::<u64>().ok());
        let stones = args.get(2).and_then(|s| s.parse::<usize>().ok());

        match (color, time, stones) {
            (Some(color), Some(time), Some(stones)) => {
                self.game.adjust_time(color, Duration::from_secs(time), stones);
                Response::Success("".into())
            },
            _ => Response::Failure("syntax error".into())
        }
    }
}

/// Splits a leading numeric id off a command line.
fn split_id(line: &str) -> (Option<&str>, &str) {
    let mut parts = line.splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("");

    if !first.is_empty() && first.chars().all(|ch| ch.is_ascii_digit()) {
        (Some(first), parts.next().unwrap_or("").trim())
    } else {
        (None, line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sente_mcts::predict::UniformPredictor;

    fn run_session(commands: &str) -> Vec<String> {
        let mut engine = Gtp::new(Arc::new(UniformPredictor));
        let mut output = Vec::new();

        engine.run(commands.as_bytes(), &mut output).expect("session failed");

        String::from_utf8(output)
            .expect("output is not utf-8")
            .split("\n\n")
            .filter(|chunk| !chunk.is_empty())
            .map(|chunk| chunk.to_string())
            .collect()
    }

    #[test]
    fn protocol_basics() {
        let replies = run_session("protocol_version\n1 name\nknown_command genmove\nquit\n");

        assert_eq!(replies[0], "= 2");
        assert_eq!(replies[1], "=1 Sente");
        assert_eq!(replies[2], "= true");
        assert_eq!(replies[3], "= ");
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let replies = run_session("# nothing\n\nname # trailing\n");

        assert_eq!(replies, vec!["= Sente"]);
    }

    #[test]
    fn play_and_undo() {
        let replies = run_session("boardsize 9\nplay b e5\nplay w e4\nundo\nplay w i9\nplay w j9\n");

        assert_eq!(replies[0], "= ");
        assert_eq!(replies[1], "= ");
        assert_eq!(replies[2], "= ");
        assert_eq!(replies[3], "= ");
        assert!(replies[4].starts_with("? "), "i is not a column: {}", replies[4]);
        assert_eq!(replies[5], "= ");
    }

    #[test]
    fn illegal_moves_are_refused_politely() {
        let replies = run_session("boardsize 9\nplay b e5\nplay w e5\n");

        assert!(replies[2].starts_with("? illegal move"));
    }

    #[test]
    fn unknown_commands_fail() {
        let replies = run_session("made_up_command\n");

        assert!(replies[0].starts_with("? unknown command"));
    }

    #[test]
    fn boardsize_bounds() {
        let replies = run_session("boardsize 25\nboardsize 19\nboardsize banana\n");

        assert!(replies[0].starts_with("? unacceptable size"));
        assert_eq!(replies[1], "= ");
        assert!(replies[2].starts_with("? syntax error"));
    }

    #[test]
    fn final_score_empty_board() {
        let replies = run_session("boardsize 9\nkomi 7.5\nfinal_score\n");

        assert_eq!(replies[2], "= W+7.5");
    }

    #[test]
    fn genmove_plays_a_move() {
        let replies = run_session("boardsize 5\ngenmove b\n");

        assert!(replies[1].starts_with("= "), "unexpected reply: {}", replies[1]);

        let vertex = replies[1].trim_start_matches("= ").trim();
        assert!(Vertex::from_text(5, vertex).is_some(), "not a vertex: {}", vertex);
    }

    #[test]
    fn showboard_renders() {
        let replies = run_session("boardsize 5\nplay b c3\nshowboard\n");

        assert!(replies[2].contains('X'));
        assert!(replies[2].contains(" A B C D E"));
    }
}
