//! Mensura MCP Server
//!
//! Line-delimited JSON-RPC 2.0 over stdio, MCP spec 2025-11-25
//!
//! Tools:
//! - convert: Convert a quantity to other units
//! - inspect: Show the structure of a quantity
//! - calculate: Add, subtract, multiply or divide two quantities
//! - compare: Order two compatible quantities
//! - round: Round a quantity to the nearest multiple of a precision
//! - convert_single_unit: Swap one unit factor inside a compound unit
//! - list_kinds / list_units / aliases: Browse the unit table

use std::env;
use std::io::{self, BufRead, Write};

use mensura_core::{ErrorReport, QtyError};
use mensura_units::{get_aliases, get_kinds, get_units, Quantity};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

const PROTOCOL_VERSION: &str = "2025-11-25";
const SERVER_NAME: &str = "mensura";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

const PARSE_ERROR: i32 = -32700;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;

/// Settings read from the environment once at startup
#[derive(Debug, Clone, Default, PartialEq)]
struct ServerConfig {
    /// Decimals applied when a tool renders a quantity and the caller
    /// passed none
    max_decimals: Option<i32>,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_decimals = lookup("MENSURA_MAX_DECIMALS").and_then(|raw| {
            match raw.trim().parse::<i32>() {
                Ok(decimals) => Some(decimals),
                Err(e) => {
                    warn!(value = %raw, "Ignoring MENSURA_MAX_DECIMALS: {}", e);
                    None
                }
            }
        });
        ServerConfig { max_decimals }
    }
}

// MCP Protocol types
#[derive(Debug, Deserialize)]
struct McpRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<JsonValue>,
    method: String,
    #[serde(default)]
    params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
struct McpResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<McpError>,
}

#[derive(Debug, Serialize)]
struct McpError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<JsonValue>,
}

impl McpError {
    fn invalid_params(message: impl Into<String>) -> Self {
        McpError {
            code: INVALID_PARAMS,
            message: message.into(),
            data: None,
        }
    }
}

impl McpResponse {
    fn failure(id: Option<JsonValue>, error: McpError) -> Self {
        McpResponse {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

fn main() {
    init_logging();
    let config = ServerConfig::from_env();

    info!(
        version = SERVER_VERSION,
        protocol = PROTOCOL_VERSION,
        max_decimals = ?config.max_decimals,
        "Mensura MCP server started"
    );

    let stdin = io::stdin();
    let mut reader = io::BufReader::new(stdin.lock());

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => {
                info!("Client disconnected (EOF)");
                break;
            }
            Ok(_) => {
                let Some(response) = handle_line(&config, &line) else {
                    continue;
                };
                if let Err(e) = write_response(&response) {
                    error!("Error writing response: {}", e);
                    break;
                }
            }
            Err(e) => {
                error!("Error reading input: {}", e);
                break;
            }
        }
    }

    info!("Server shutting down");
}

/// One input line -> the response to send, if any
fn handle_line(config: &ServerConfig, line: &str) -> Option<McpResponse> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let request: McpRequest = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            warn!("Error parsing request: {}", e);
            return Some(McpResponse::failure(
                None,
                McpError {
                    code: PARSE_ERROR,
                    message: format!("Parse error: {}", e),
                    data: None,
                },
            ));
        }
    };

    debug!(method = %request.method, "Processing request");
    let response = handle_request(config, &request);

    // Notifications (no id) get no response
    if request.id.is_none() {
        debug!(method = %request.method, "Notification processed");
        return None;
    }
    Some(response)
}

fn write_response(response: &McpResponse) -> io::Result<()> {
    let response_json = serde_json::to_string(response)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", response_json)?;
    stdout.flush()
}

fn handle_request(config: &ServerConfig, request: &McpRequest) -> McpResponse {
    let result = match request.method.as_str() {
        // Lifecycle
        "initialize" => handle_initialize(&request.params),
        "initialized" => Ok(json!({})),
        "ping" => Ok(json!({})),

        // Tools
        "tools/list" => handle_tools_list(),
        "tools/call" => handle_tool_call(config, &request.params),

        _ => Err(McpError {
            code: METHOD_NOT_FOUND,
            message: format!("Method not found: {}", request.method),
            data: None,
        }),
    };

    match result {
        Ok(r) => McpResponse {
            jsonrpc: "2.0".to_string(),
            id: request.id.clone(),
            result: Some(r),
            error: None,
        },
        Err(e) => McpResponse::failure(request.id.clone(), e),
    }
}

fn handle_initialize(params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let client_info = params
        .as_ref()
        .and_then(|p| p.get("clientInfo"))
        .and_then(|c| c.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unknown");

    let client_protocol = params
        .as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(|v| v.as_str())
        .unwrap_or(PROTOCOL_VERSION);

    info!(client = client_info, protocol = client_protocol, "Client connected");

    Ok(json!({
        "protocolVersion": client_protocol,
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION,
            "description": "Physical quantities with units, conversion and dimensional analysis"
        },
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        },
        "instructions": "Mensura parses quantities such as '2.5 kg*m/s^2' or '20 tempC' and converts between compatible units. Use 'list_kinds' and 'list_units' to discover the unit vocabulary. Absolute temperatures (tempC, tempF) and temperature differences (degC, degF) are distinct units."
    }))
}

fn handle_tools_list() -> Result<JsonValue, McpError> {
    Ok(json!({
        "tools": [
            {
                "name": "convert",
                "description": "Convert a quantity to other, compatible units. Inverse units (ohm -> siemens) convert through the reciprocal.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "quantity": { "type": "string", "description": "Quantity to convert, e.g. '36 km/h'" },
                        "target": { "type": "string", "description": "Target units, e.g. 'm/s'" },
                        "decimals": { "type": "integer", "description": "Maximum decimals in the rendered result" }
                    },
                    "required": ["quantity", "target"]
                }
            },
            {
                "name": "inspect",
                "description": "Show the scalar, units, kind, dimension signature and base form of a quantity",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "quantity": { "type": "string", "description": "Quantity to inspect" }
                    },
                    "required": ["quantity"]
                }
            },
            {
                "name": "calculate",
                "description": "Combine two quantities. add/sub need compatible units; mul/div combine units.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "left": { "type": "string" },
                        "op": { "type": "string", "enum": ["add", "sub", "mul", "div"] },
                        "right": { "type": "string" },
                        "decimals": { "type": "integer", "description": "Maximum decimals in the rendered result" }
                    },
                    "required": ["left", "op", "right"]
                }
            },
            {
                "name": "compare",
                "description": "Compare two compatible quantities: -1, 0 or 1. 'same' also requires identical units.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "left": { "type": "string" },
                        "right": { "type": "string" }
                    },
                    "required": ["left", "right"]
                }
            },
            {
                "name": "round",
                "description": "Round a quantity to the nearest multiple of a precision, e.g. '0.05 ft'",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "quantity": { "type": "string" },
                        "precision": { "type": "string", "description": "Precision quantity or unit, e.g. '0.1 bar' or 'cm'" }
                    },
                    "required": ["quantity", "precision"]
                }
            },
            {
                "name": "convert_single_unit",
                "description": "Replace one unit factor inside a compound unit, e.g. kWh -> MWh in 'USD/kWh'",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "quantity": { "type": "string" },
                        "from": { "type": "string", "description": "Unit to replace, a single unit with optional prefix" },
                        "to": { "type": "string", "description": "Replacement unit, a single unit with optional prefix" }
                    },
                    "required": ["quantity", "from", "to"]
                }
            },
            {
                "name": "list_kinds",
                "description": "List every kind of quantity (length, speed, energy, ...)",
                "inputSchema": {
                    "type": "object",
                    "properties": {}
                }
            },
            {
                "name": "list_units",
                "description": "List unit names, optionally restricted to one kind",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "kind": { "type": "string", "description": "Kind to filter by, e.g. 'pressure'" }
                    }
                }
            },
            {
                "name": "aliases",
                "description": "List every alias of a unit",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "unit": { "type": "string", "description": "Any alias of the unit, e.g. 'ft'" }
                    },
                    "required": ["unit"]
                }
            }
        ]
    }))
}

fn handle_tool_call(config: &ServerConfig, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let params = params
        .as_ref()
        .ok_or_else(|| McpError::invalid_params("Missing params"))?;

    let name = params
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;

    let args = params.get("arguments").cloned().unwrap_or(json!({}));
    debug!(tool = name, "Tool call");

    match name {
        "convert" => tool_convert(config, &args),
        "inspect" => tool_inspect(&args),
        "calculate" => tool_calculate(config, &args),
        "compare" => tool_compare(&args),
        "round" => tool_round(config, &args),
        "convert_single_unit" => tool_convert_single_unit(config, &args),
        "list_kinds" => Ok(tool_list_kinds()),
        "list_units" => tool_list_units(&args),
        "aliases" => tool_aliases(&args),
        _ => Err(McpError::invalid_params(format!("Unknown tool: {}", name))),
    }
}

// ========== Argument helpers ==========

fn required_str<'a>(args: &'a JsonValue, key: &str) -> Result<&'a str, McpError> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params(format!("Missing {} argument", key)))
}

fn optional_str<'a>(args: &'a JsonValue, key: &str) -> Result<Option<&'a str>, McpError> {
    match args.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(v) => v
            .as_str()
            .map(Some)
            .ok_or_else(|| McpError::invalid_params(format!("{} must be a string", key))),
    }
}

/// `decimals` argument, falling back to the configured default
fn decimals(config: &ServerConfig, args: &JsonValue) -> Result<Option<i32>, McpError> {
    match args.get("decimals") {
        None | Some(JsonValue::Null) => Ok(config.max_decimals),
        Some(v) => v
            .as_i64()
            .and_then(|d| i32::try_from(d).ok())
            .map(Some)
            .ok_or_else(|| McpError::invalid_params("decimals must be an integer")),
    }
}

// ========== Tool results ==========

fn text_result(text: String, extra: JsonValue) -> JsonValue {
    let mut result = json!({
        "content": [{ "type": "text", "text": text }],
        "isError": false
    });
    if let (Some(result), JsonValue::Object(extra)) = (result.as_object_mut(), extra) {
        result.extend(extra);
    }
    result
}

fn error_result(err: &QtyError) -> JsonValue {
    let report = ErrorReport::from(err);
    json!({
        "content": [{ "type": "text", "text": report.to_string() }],
        "error": report,
        "isError": true
    })
}

/// Engine failures are tool results, not protocol errors
fn engine_result(result: Result<JsonValue, QtyError>) -> JsonValue {
    result.unwrap_or_else(|e| {
        debug!(code = e.code(), "Engine error: {}", e);
        error_result(&e)
    })
}

/// Rendered text plus the structured scalar and unit
fn quantity_result(qty: &Quantity, decimals: Option<i32>) -> Result<JsonValue, QtyError> {
    let text = qty.to_string_in(None, decimals)?;
    Ok(text_result(
        text,
        json!({ "scalar": qty.scalar(), "unit": qty.unit() }),
    ))
}

// ========== Tools ==========

fn tool_convert(config: &ServerConfig, args: &JsonValue) -> Result<JsonValue, McpError> {
    let quantity = required_str(args, "quantity")?;
    let target = required_str(args, "target")?;
    let decimals = decimals(config, args)?;

    Ok(engine_result(convert_quantity(quantity, target, decimals)))
}

fn convert_quantity(quantity: &str, target: &str, decimals: Option<i32>) -> Result<JsonValue, QtyError> {
    let converted = Quantity::parse(quantity)?.to(target)?;
    quantity_result(&converted, decimals)
}

fn tool_inspect(args: &JsonValue) -> Result<JsonValue, McpError> {
    let quantity = required_str(args, "quantity")?;

    Ok(engine_result(inspect_quantity(quantity)))
}

fn inspect_quantity(quantity: &str) -> Result<JsonValue, QtyError> {
    let qty = Quantity::parse(quantity)?;
    let record = qty.to_record();
    let text = format!("{} ({})", qty, qty.kind().unwrap_or("no kind"));

    Ok(text_result(
        text,
        json!({
            "scalar": qty.scalar(),
            "unit": qty.unit(),
            "numerator": record.numerator,
            "denominator": record.denominator,
            "kind": qty.kind(),
            "signature": qty.signature(),
            "dimension": qty.dimension().to_string(),
            "base": qty.to_base().to_string(),
            "isBase": qty.is_base(),
            "isUnitless": qty.is_unitless(),
            "isDegrees": qty.is_degrees(),
            "isTemperature": qty.is_temperature()
        }),
    ))
}

fn tool_calculate(config: &ServerConfig, args: &JsonValue) -> Result<JsonValue, McpError> {
    let left = required_str(args, "left")?;
    let op = required_str(args, "op")?;
    let right = required_str(args, "right")?;
    let decimals = decimals(config, args)?;

    if !matches!(op, "add" | "sub" | "mul" | "div") {
        return Err(McpError::invalid_params(format!(
            "Unknown op: {} (expected add, sub, mul or div)",
            op
        )));
    }

    Ok(engine_result(calculate(left, op, right, decimals)))
}

/// `op` is one of add, sub, mul, div
fn calculate(left: &str, op: &str, right: &str, decimals: Option<i32>) -> Result<JsonValue, QtyError> {
    let left = Quantity::parse(left)?;
    let result = match op {
        "add" => left.add(right)?,
        "sub" => left.sub(right)?,
        "mul" => left.mul(right)?,
        _ => left.div(right)?,
    };
    quantity_result(&result, decimals)
}

fn tool_compare(args: &JsonValue) -> Result<JsonValue, McpError> {
    let left = required_str(args, "left")?;
    let right = required_str(args, "right")?;

    Ok(engine_result(compare_quantities(left, right)))
}

fn compare_quantities(left: &str, right: &str) -> Result<JsonValue, QtyError> {
    let left = Quantity::parse(left)?;
    let right = Quantity::parse(right)?;
    let order = left.compare_to(&right)? as i8;
    let symbol = match order {
        -1 => "<",
        0 => "=",
        _ => ">",
    };
    Ok(text_result(
        format!("{} {} {}", left, symbol, right),
        json!({ "comparison": order, "same": left.same(&right) }),
    ))
}

fn tool_round(config: &ServerConfig, args: &JsonValue) -> Result<JsonValue, McpError> {
    let quantity = required_str(args, "quantity")?;
    let precision = required_str(args, "precision")?;
    let decimals = decimals(config, args)?;

    Ok(engine_result(round_quantity(quantity, precision, decimals)))
}

fn round_quantity(quantity: &str, precision: &str, decimals: Option<i32>) -> Result<JsonValue, QtyError> {
    let rounded = Quantity::parse(quantity)?.to_prec(precision)?;
    quantity_result(&rounded, decimals)
}

fn tool_convert_single_unit(config: &ServerConfig, args: &JsonValue) -> Result<JsonValue, McpError> {
    let quantity = required_str(args, "quantity")?;
    let from = required_str(args, "from")?;
    let to = required_str(args, "to")?;
    let decimals = decimals(config, args)?;

    Ok(engine_result(swap_unit_factor(quantity, from, to, decimals)))
}

fn swap_unit_factor(
    quantity: &str,
    from: &str,
    to: &str,
    decimals: Option<i32>,
) -> Result<JsonValue, QtyError> {
    let converted = Quantity::parse(quantity)?.convert_single_unit(from, to)?;
    quantity_result(&converted, decimals)
}

fn tool_list_kinds() -> JsonValue {
    let kinds = get_kinds();
    text_result(kinds.join(", "), json!({ "kinds": kinds }))
}

fn tool_list_units(args: &JsonValue) -> Result<JsonValue, McpError> {
    let kind = optional_str(args, "kind")?;

    Ok(engine_result(get_units(kind).map(|units| {
        text_result(units.join(", "), json!({ "units": units }))
    })))
}

fn tool_aliases(args: &JsonValue) -> Result<JsonValue, McpError> {
    let unit = required_str(args, "unit")?;

    Ok(engine_result(get_aliases(unit).map(|aliases| {
        text_result(aliases.join(", "), json!({ "aliases": aliases }))
    })))
}
