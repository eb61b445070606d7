//! Board control panel served over plain TCP.
//!
//! Configuration comes from the environment (a `.env` file is honoured):
//!
//! - `WEBAPP_CONFIG`: JSON server configuration, e.g.
//!   `{"address":"0.0.0.0:8081","read_timeout_ms":5000}`
//! - `WEBAPP_PINS`: comma separated pin names, defaults to `LED,D0,D1,D2`

use core::cell::Cell;
use core::fmt::Write as _;
use std::env;

use dotenvy::dotenv;
use heapless::String;
use libhttpd::network::application::http::*;
use libhttpd::network::error::Error;
use libhttpd::network::tcp::{TcpAcceptor, TcpConnection};
use serde::Serialize;

const INDEX_HTML: &str = "<!DOCTYPE html>\n\
<html><head><title>libhttpd</title></head>\n\
<body><h1>Board</h1><div id=\"info\"></div><div id=\"pins\"></div></body></html>\n";

const MAX_PINS: usize = 16;

/// Output pins the panel can toggle.
#[derive(Debug)]
struct PinBank {
    names: heapless::Vec<std::string::String, MAX_PINS>,
    levels: [Cell<bool>; MAX_PINS],
}

impl PinBank {
    fn new<'s>(names: impl Iterator<Item = &'s str>) -> Self {
        let mut bank = Self {
            names: heapless::Vec::new(),
            levels: Default::default(),
        };
        for name in names.map(str::trim).filter(|name| !name.is_empty()) {
            if bank.names.push(name.to_string()).is_err() {
                eprintln!("webapp: ignoring pin {name}, at most {MAX_PINS} are supported");
            }
        }
        bank
    }

    fn toggle(&self, name: &str) -> Option<bool> {
        let index = self.names.iter().position(|pin| pin == name)?;
        let level = &self.levels[index];
        level.set(!level.get());
        Some(level.get())
    }
}

#[derive(Serialize)]
struct InfoEntry<'a> {
    title: &'a str,
    value: &'a str,
}

#[derive(Serialize)]
struct PinList<'a> {
    pins: &'a [&'a str],
}

#[derive(Serialize)]
struct PinState<'a> {
    pin: &'a str,
    on: bool,
}

#[derive(Debug, Clone, Copy)]
enum Endpoint {
    Index,
    Info,
    Pins,
    Toggle,
    Missing,
}

#[derive(Debug, Clone, Copy)]
struct Page<'a> {
    endpoint: Endpoint,
    bank: &'a PinBank,
    address: &'a str,
}

type Resp<'c> = Response<'c, TcpConnection>;

fn send_json<T: Serialize>(resp: &mut Resp<'_>, value: &T) -> HandlerResult {
    let body: String<512> =
        serde_json_core::to_string(value).map_err(|_| HandlerError::Failed("json overflow"))?;
    resp.add_header("content-type", "application/json")?;
    resp.send(body.as_bytes())?;
    Ok(())
}

impl Page<'_> {
    fn index(&self, resp: &mut Resp<'_>) -> HandlerResult {
        let mut length: String<10> = String::new();
        write!(length, "{}", INDEX_HTML.len()).map_err(|_| HandlerError::Failed("length"))?;
        resp.add_header("content-length", &length)?;
        resp.add_header("content-type", "text/html")?;
        resp.send(INDEX_HTML.as_bytes())?;
        Ok(())
    }

    fn info(&self, resp: &mut Resp<'_>) -> HandlerResult {
        let entries = [
            InfoEntry {
                title: "Platform",
                value: env::consts::OS,
            },
            InfoEntry {
                title: "Architecture",
                value: env::consts::ARCH,
            },
            InfoEntry {
                title: "Network",
                value: self.address,
            },
        ];
        send_json(resp, &entries.as_slice())
    }

    fn pins(&self, resp: &mut Resp<'_>) -> HandlerResult {
        let names: heapless::Vec<&str, MAX_PINS> =
            self.bank.names.iter().map(|name| name.as_str()).collect();
        send_json(resp, &PinList { pins: &names })
    }

    fn toggle(&self, resp: &mut Resp<'_>, pin: &str) -> HandlerResult {
        let on = self.bank.toggle(pin).ok_or(HttpError::NotFound)?;
        println!("webapp: pin {pin} is now {}", if on { "on" } else { "off" });
        send_json(resp, &PinState { pin, on })
    }
}

impl Handler<TcpConnection> for Page<'_> {
    fn call(
        &self,
        request: &Request<'_>,
        response: &mut Response<'_, TcpConnection>,
        params: &[&str],
    ) -> HandlerResult {
        match self.endpoint {
            Endpoint::Index => self.index(response),
            Endpoint::Info => self.info(response),
            Endpoint::Pins => self.pins(response),
            Endpoint::Toggle => self.toggle(response, params[0]),
            Endpoint::Missing => {
                eprintln!(
                    "webapp: no route for {}",
                    std::string::String::from_utf8_lossy(request.path())
                );
                Err(HttpError::NotFound.into())
            }
        }
    }
}

fn routes<'a>(page: impl Fn(Endpoint) -> Page<'a>) -> Result<Router<'static, Page<'a>>, RouteError> {
    let get = &[Method::Get];
    let mut router = Router::new();
    router.add_route("/", page(Endpoint::Index), get, RouteOptions::default())?;
    router.add_route("/info", page(Endpoint::Info), get, RouteOptions::default())?;
    router.add_route("/pins/", page(Endpoint::Pins), get, RouteOptions::default())?;
    router.add_route(
        "/pins/<pin_name>/toggle",
        page(Endpoint::Toggle),
        &[Method::Post],
        RouteOptions::default(),
    )?;
    router.set_catchall(page(Endpoint::Missing));
    Ok(router)
}

fn main() -> Result<(), Error> {
    dotenv().ok();
    let json = env::var("WEBAPP_CONFIG").unwrap_or_default();
    let config = if json.is_empty() {
        ServerConfig::default()
    } else {
        ServerConfig::from_json(&json).unwrap_or_else(|err| {
            eprintln!("webapp: invalid WEBAPP_CONFIG ({err:?}), using defaults");
            ServerConfig::default()
        })
    };
    let pins = env::var("WEBAPP_PINS").unwrap_or("LED,D0,D1,D2".to_string());
    let bank = PinBank::new(pins.split(','));

    let page = |endpoint| Page {
        endpoint,
        bank: &bank,
        address: config.address,
    };
    let router = routes(page).map_err(|err| {
        eprintln!("webapp: route table rejected: {err:?}");
        Error::InvalidAddress
    })?;

    let mut acceptor = TcpAcceptor::listen(&config)?;
    if let Some(local) = acceptor.local_addr() {
        println!("webapp: listening on http://{local}");
    }
    Server::new(router).serve(&mut acceptor, config.address)
}
