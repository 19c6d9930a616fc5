use clap::{Arg, ArgAction, Command};

use crate::keys::Key;
use crate::value::{parse_bool, Kind, Value};

#[derive(Debug, Clone, Copy)]
pub struct Setting {
  pub key: Key,
  pub kind: Kind,
  /// Raw text, parsed through the same path as environment values.
  pub default: &'static str,
  pub help: &'static str,
}

impl Setting {
  pub fn name(&self) -> &'static str {
    self.key.canonical()
  }

  pub fn default_value(&self) -> Value {
    // Defaults are covered by `every_default_parses`.
    Value::parse(self.kind, self.default).unwrap_or_else(|_| Value::Str(self.default.to_string()))
  }
}

const fn setting(key: Key, kind: Kind, default: &'static str, help: &'static str) -> Setting {
  Setting { key, kind, default, help }
}

/// Every setting the agent recognizes, in key order.
static SETTINGS: [Setting; 28] = [
  setting(
    Key::Mode,
    Kind::Str,
    "",
    r#"Specify the EC Agent Mode in "client", "server", or "gateway"."#,
  ),
  setting(Key::Version, Kind::Bool, "false", "Show EC Agent's version."),
  setting(
    Key::ListenPort,
    Kind::Str,
    "",
    r#"Specify the EC port# if the "client" mode is set."#,
  ),
  setting(
    Key::TargetServerId,
    Kind::Str,
    "",
    r#"Specify the Target EC Server Id if the "client" mode is set"#,
  ),
  setting(
    Key::GatewayHost,
    Kind::Str,
    "",
    "Specify the EC Gateway URI. E.g. wss://<somedomain>:8989",
  ),
  setting(
    Key::ServiceHost,
    Kind::Str,
    "",
    "Specify the EC Service URI. E.g. https://<service.of.predix.io>",
  ),
  setting(Key::Signing, Kind::Bool, "false", "Start a CA Cert-Signing process."),
  setting(
    Key::ResourceHost,
    Kind::Str,
    "",
    r#"Specify the Resource Host if the "server" mode is set. E.g. <someip>, <somedomain>. value will be discard when TLS is specified."#,
  ),
  setting(
    Key::ResourcePort,
    Kind::Str,
    "0",
    r#"Specify the Resource Port# if the "server" mode is set. E.g. 8989, 38989"#,
  ),
  setting(
    Key::AgentId,
    Kind::Str,
    "",
    "Specify the agent Id assigned by the EC Service. You may find it in the Cloud Foundry VCAP_SERVICE",
  ),
  setting(
    Key::Token,
    Kind::Str,
    "",
    "Specify the OAuth Token. The token may expire depending on your OAuth provisioner. This flag is ignored if OAuth2 Auto-Refresh were set.",
  ),
  setting(
    Key::Proxy,
    Kind::Str,
    "",
    "Specify a local Proxy service. E.g. http://hello.world.com:8080",
  ),
  setting(
    Key::ClientId,
    Kind::Str,
    "",
    "Specify the client Id to auto-refresh the OAuth2 token.",
  ),
  setting(
    Key::ClientSecret,
    Kind::Str,
    "",
    "Specify the client secret to auto-refresh the OAuth2 token.",
  ),
  setting(
    Key::OAuth2Url,
    Kind::Str,
    "",
    "Specify URL of the OAuth2 provisioner. E.g. https://<somedomain>/oauth/token",
  ),
  setting(
    Key::RefreshDuration,
    Kind::Duration,
    "0",
    "Specify the duration for the next token refresh in seconds. (default 100 years)",
  ),
  setting(
    Key::Certificate,
    Kind::Str,
    "",
    "Specify the relative path of a digital certificate to operate the EC agent. (.pfx, .cer, .p7s, .der, .pem, .crt)",
  ),
  setting(
    Key::AllowList,
    Kind::Str,
    "0.0.0.0/0,::/0",
    "Specify the ip(s) whitelist in the cidr net format. Concatenate ips by comma. E.g. 89.24.9.0/24, 7.6.0.0/16",
  ),
  setting(
    Key::BlockList,
    Kind::Str,
    "",
    "Specify the ip(s) blocklist in the IPv4/IPv6 format. Concatenate ips by comma. E.g. 10.20.30.5, 2002:4559:1FE2::4559:1FE2",
  ),
  setting(
    Key::Plugins,
    Kind::Str,
    "",
    r#"Enable plugin list. Available options "tls", "ip-route", etc. "#,
  ),
  setting(Key::Info, Kind::Bool, "false", "The Product Information."),
  setting(
    Key::Debug,
    Kind::Bool,
    "false",
    "Turn on debug mode. This will introduce more error information. E.g. connection error.",
  ),
  setting(
    Key::Verify,
    Kind::Bool,
    "false",
    "Verify the legitimacy of a digital certificate.",
  ),
  setting(
    Key::Zone,
    Kind::Str,
    "",
    r#"Specify the Zone/Service Inst. Id. required in the "gateway" mode."#,
  ),
  setting(
    Key::TlsKey,
    Kind::Str,
    "",
    "Specify the relative path to a TLS key when operate as the gateway as desired. E.g. ./path/to/key.pem.",
  ),
  setting(
    Key::TlsCert,
    Kind::Str,
    "",
    "Specify the relative path to a TLS cert when operate as the gateway as desired. E.g. ./path/to/cert.pem.",
  ),
  setting(
    Key::HealthCheckPort,
    Kind::Str,
    "",
    r#"Specify a port# to turn on the Healthcheck API. This flag is always on when in the "gateway mode" with the provisioned local port. Upon provisioned, the api is available at <agent_uri>/health."#,
  ),
  setting(
    Key::GenerateCertRequest,
    Kind::Bool,
    "false",
    "Generate a certificate request for the usage validation purpose.",
  ),
];

pub fn settings() -> &'static [Setting] {
  &SETTINGS
}

pub fn lookup(name: &str) -> Option<&'static Setting> {
  SETTINGS.iter().find(|s| s.name() == name)
}

pub fn for_key(key: Key) -> &'static Setting {
  // One descriptor per key, declared in key order.
  &SETTINGS[key as usize]
}

/// Command-line surface: one long flag per setting.
///
/// Values are kept as raw strings; the resolver parses them by kind so every
/// layer shares one conversion path. Registry defaults are not handed to
/// clap, so a present value always means "set on the command line".
pub fn command() -> Command {
  let mut cmd = Command::new("ec-agent")
    .about("EC agent: runs as client, server or gateway")
    .disable_version_flag(true);

  for s in settings() {
    let help = if s.default.is_empty() || s.kind == Kind::Bool {
      s.help.to_string()
    } else {
      format!("{} [default: {}]", s.help, s.default)
    };

    let arg = Arg::new(s.name()).long(s.name()).help(help);
    let arg = match s.kind {
      Kind::Bool => arg
        .num_args(0..=1)
        .require_equals(true)
        .default_missing_value("true")
        .value_parser(|raw: &str| parse_bool(raw).map(|b| b.to_string()))
        .action(ArgAction::Set),
      Kind::Str | Kind::Int | Kind::Duration => arg
        .num_args(1)
        .value_name(value_name(s.kind))
        .action(ArgAction::Set),
    };
    cmd = cmd.arg(arg);
  }

  cmd
}

fn value_name(kind: Kind) -> &'static str {
  match kind {
    Kind::Str => "VALUE",
    Kind::Bool => "BOOL",
    Kind::Int => "INT",
    Kind::Duration => "SECONDS",
  }
}
