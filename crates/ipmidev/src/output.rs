use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use ipmidev_exchange::Reply;
use ipmidev_transport::Address;
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ReplyOutput {
    netfn: u8,
    cmd: u8,
    recv_type: i32,
    completion_code: u8,
    data: Vec<u8>,
    data_hex: String,
    responder: Option<String>,
}

pub fn print_reply(reply: &Reply, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = ReplyOutput {
                netfn: reply.netfn,
                cmd: reply.cmd,
                recv_type: reply.recv_type,
                completion_code: reply.completion_code,
                data: reply.data.to_vec(),
                data_hex: hex(&reply.data),
                responder: reply.address.as_ref().map(describe_address),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["NETFN", "CMD", "CC", "SIZE", "DATA"])
                .add_row(vec![
                    format!("{:#04x}", reply.netfn),
                    format!("{:#04x}", reply.cmd),
                    format!("{:#04x}", reply.completion_code),
                    reply.data.len().to_string(),
                    hex(&reply.data),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "netfn={:#04x} cmd={:#04x} cc={:#04x} size={} data={}",
                reply.netfn,
                reply.cmd,
                reply.completion_code,
                reply.data.len(),
                hex(&reply.data)
            );
        }
        OutputFormat::Raw => {
            let mut bytes = Vec::with_capacity(reply.data.len() + 1);
            bytes.push(reply.completion_code);
            bytes.extend_from_slice(&reply.data);
            print_raw(&bytes);
        }
    }
}

/// Print a flat record of named values.
pub fn print_fields(fields: &[(&str, Value)], format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{}", fields_json(fields)),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"]);
            for (name, value) in fields {
                table.add_row(vec![name.to_string(), plain(value)]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            let line = fields
                .iter()
                .map(|(name, value)| format!("{name}={}", plain(value)))
                .collect::<Vec<_>>()
                .join(" ");
            println!("{line}");
        }
        OutputFormat::Raw => {
            for (_, value) in fields {
                println!("{}", plain(value));
            }
        }
    }
}

fn fields_json(fields: &[(&str, Value)]) -> Value {
    let out = fields
        .iter()
        .map(|(name, value)| ((*name).to_string(), value.clone()))
        .collect::<serde_json::Map<_, _>>();
    Value::Object(out)
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

pub fn hex(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn describe_address(address: &Address) -> String {
    match *address {
        Address::SystemInterface { channel, lun } => {
            format!("system-interface channel={channel:#x} lun={lun}")
        }
        Address::Ipmb {
            channel,
            slave_addr,
            lun,
        } => format!("ipmb channel={channel} addr={slave_addr:#04x} lun={lun}"),
        Address::IpmbBroadcast {
            channel,
            slave_addr,
            lun,
        } => format!("ipmb-broadcast channel={channel} addr={slave_addr:#04x} lun={lun}"),
        Address::IpmbDirect {
            channel,
            slave_addr,
            rs_lun,
            rq_lun,
        } => format!(
            "ipmb-direct channel={channel} addr={slave_addr:#04x} rs_lun={rs_lun} rq_lun={rq_lun}"
        ),
        Address::Lan {
            channel,
            session_handle,
            remote_swid,
            ..
        } => format!("lan channel={channel} session={session_handle} swid={remote_swid:#04x}"),
    }
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_is_space_separated_lowercase() {
        assert_eq!(hex(&[0x00, 0xab, 0x10]), "00 ab 10");
        assert_eq!(hex(&[]), "");
    }

    #[test]
    fn bmc_address_description() {
        assert_eq!(
            describe_address(&Address::bmc()),
            "system-interface channel=0xf lun=0"
        );
    }

    #[test]
    fn fields_json_holds_only_the_given_fields() {
        let out = fields_json(&[("device", Value::from(0)), ("mode", Value::from("auto"))]);
        assert_eq!(out, serde_json::json!({"device": 0, "mode": "auto"}));
    }

    #[test]
    fn plain_strips_json_quotes() {
        assert_eq!(plain(&Value::from("on")), "on");
        assert_eq!(plain(&Value::from(32)), "32");
    }
}
