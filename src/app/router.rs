//! Request router.
//!
//! Maps a request URI onto a command or a status read and builds the
//! response. Transport-agnostic: the HTTP adapter hands in the URI and
//! writes back whatever [`Response`] comes out.
//!
//! | URI                         | Action                     | Body            |
//! |-----------------------------|----------------------------|-----------------|
//! | `/`                         | static UI page             | HTML            |
//! | `/xml`                      | status report              | XML             |
//! | `/json`                     | status report              | JSON            |
//! | `/UPDATE_SLIDER?VALUE=<n>`  | set fan speed              | effective value |
//! | `/BUTTON_0`                 | toggle indicator           | empty           |
//! | `/BUTTON_1`                 | toggle auxiliary output    | empty           |

use std::borrow::Cow;

use log::{debug, error};

use super::commands::CommandInterface;
use super::ports::{ActuatorPort, SchedulerProbe};
use super::status::StatusReporter;

pub const INDEX_HTML: &str = include_str!("../../assets/index.html");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Index,
    Xml,
    Json,
    UpdateSlider(i64),
    Button0,
    Button1,
    NotFound,
}

impl Route {
    pub fn parse(uri: &str) -> Self {
        let (path, query) = uri.split_once('?').unwrap_or((uri, ""));
        match path {
            "/" => Self::Index,
            "/xml" => Self::Xml,
            "/json" => Self::Json,
            "/UPDATE_SLIDER" => {
                Self::UpdateSlider(query_param(query, "VALUE").map_or(0, lenient_int))
            }
            "/BUTTON_0" => Self::Button0,
            "/BUTTON_1" => Self::Button1,
            _ => Self::NotFound,
        }
    }
}

fn query_param<'a>(query: &'a str, name: &str) -> Option<&'a str> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find_map(|(k, v)| (k == name).then_some(v))
}

/// Parse a leading integer the way a browser-side slider value is read:
/// leading whitespace, optional sign, then digits up to the first
/// non-digit. No digits gives `0`; overflow saturates.
pub fn lenient_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| {
            let d = i64::from(d - b'0');
            let acc = acc.saturating_mul(10);
            if negative {
                acc.saturating_sub(d)
            } else {
                acc.saturating_add(d)
            }
        })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Cow<'static, str>,
}

impl Response {
    fn ok(content_type: &'static str, body: impl Into<Cow<'static, str>>) -> Self {
        Self {
            status: 200,
            content_type,
            body: body.into(),
        }
    }

    fn empty() -> Self {
        Self::ok("text/plain", "")
    }

    fn not_found() -> Self {
        Self {
            status: 404,
            content_type: "text/plain",
            body: Cow::Borrowed("Not found"),
        }
    }

    fn internal_error() -> Self {
        Self {
            status: 500,
            content_type: "text/plain",
            body: Cow::Borrowed("Internal error"),
        }
    }
}

pub struct Router<A: ActuatorPort, P: SchedulerProbe> {
    commands: CommandInterface<A>,
    reporter: StatusReporter<P>,
}

impl<A: ActuatorPort, P: SchedulerProbe> Router<A, P> {
    pub fn new(commands: CommandInterface<A>, reporter: StatusReporter<P>) -> Self {
        Self { commands, reporter }
    }

    pub fn handle(&mut self, uri: &str) -> Response {
        let route = Route::parse(uri);
        debug!("{uri} -> {route:?}");
        match route {
            Route::Index => Response::ok("text/html", INDEX_HTML),
            Route::Xml => match self.reporter.report().render_xml() {
                Ok(xml) => Response::ok("text/xml", String::from(xml.as_str())),
                Err(_) => {
                    error!("Status XML exceeded buffer");
                    Response::internal_error()
                }
            },
            Route::Json => match self.reporter.report().to_json() {
                Ok(json) => Response::ok("application/json", json),
                Err(e) => {
                    error!("Status JSON failed: {e}");
                    Response::internal_error()
                }
            },
            Route::UpdateSlider(v) => {
                let applied = self.commands.set_fan_speed(v);
                Response::ok("text/plain", applied.to_string())
            }
            Route::Button0 => {
                self.commands.toggle_indicator();
                Response::empty()
            }
            Route::Button1 => {
                self.commands.toggle_aux_output();
                Response::empty()
            }
            Route::NotFound => Response::not_found(),
        }
    }

    pub fn commands(&self) -> &CommandInterface<A> {
        &self.commands
    }
}
