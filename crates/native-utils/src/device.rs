use anyhow::Context;
use cpal::traits::{DeviceTrait, HostTrait};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// One audio endpoint as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioDevice {
    pub name: String,
    pub channels: u16,
    pub sample_rate: u32,
    pub is_default: bool,
}

fn get_host() -> cpal::Host {
    cpal::default_host()
}

fn default_name(host: &cpal::Host, direction: Direction) -> Option<String> {
    let device = match direction {
        Direction::Input => host.default_input_device(),
        Direction::Output => host.default_output_device(),
    }?;
    device.name().ok()
}

/// Whether the host has a default microphone.
pub fn has_default_input() -> bool {
    default_name(&get_host(), Direction::Input).is_some()
}

/// Whether the host has a default speaker; speech output is only offered
/// when it does.
pub fn has_default_output() -> bool {
    default_name(&get_host(), Direction::Output).is_some()
}

/// Lists the host's devices for one direction. Devices that cannot report a
/// name or default configuration are skipped.
pub fn list_devices(direction: Direction) -> anyhow::Result<Vec<AudioDevice>> {
    for host in cpal::available_hosts() {
        tracing::debug!("Available host: {:?}", host);
    }
    let host = get_host();
    let default = default_name(&host, direction);

    let devices: Vec<cpal::Device> = match direction {
        Direction::Input => host
            .input_devices()
            .context("Failed to enumerate input devices")?
            .collect(),
        Direction::Output => host
            .output_devices()
            .context("Failed to enumerate output devices")?
            .collect(),
    };

    let mut found = Vec::new();
    for device in devices {
        let Ok(name) = device.name() else {
            continue;
        };
        let config = match direction {
            Direction::Input => device.default_input_config(),
            Direction::Output => device.default_output_config(),
        };
        let config = match config {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("Skipping {}: {}", name, e);
                continue;
            }
        };
        found.push(AudioDevice {
            is_default: default.as_deref() == Some(name.as_str()),
            name,
            channels: config.channels(),
            sample_rate: config.sample_rate().0,
        });
    }
    Ok(found)
}

/// One line per device, default marked.
pub fn describe(devices: &[AudioDevice]) -> String {
    devices
        .iter()
        .map(|d| {
            let mut line = format!(" * {}({}ch, {}hz)", d.name, d.channels, d.sample_rate);
            if d.is_default {
                line.push_str(" [default]");
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_marks_default() {
        let devices = vec![
            AudioDevice {
                name: "Built-in Speakers".into(),
                channels: 2,
                sample_rate: 48000,
                is_default: true,
            },
            AudioDevice {
                name: "USB Headset".into(),
                channels: 1,
                sample_rate: 16000,
                is_default: false,
            },
        ];
        assert_eq!(
            describe(&devices),
            " * Built-in Speakers(2ch, 48000hz) [default]\n * USB Headset(1ch, 16000hz)"
        );
        assert_eq!(describe(&[]), "");
    }
}
