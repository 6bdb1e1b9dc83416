use std::{collections::HashMap, error::Error};

use industrial_io::{Channel, ChannelType, Context, Device};

use super::{
    event::AxisData,
    info::{device_sample_rate, is_accelerometer_name, AxisInfo, MountMatrix},
};

/// Identifies an IIO device that exposes accelerometer channels
#[derive(Clone, Debug, PartialEq)]
pub struct DeviceId {
    /// IIO device id (e.g. "iio:device0")
    pub id: String,
    /// Device name (e.g. "accel_3d")
    pub name: String,
}

/// Find the first IIO device with accelerometer channels. If `wanted` is set,
/// only a device with that name or id is considered; otherwise device names
/// are matched against the known accelerometer patterns.
pub fn find_accel_device(wanted: Option<&str>) -> Option<DeviceId> {
    let ctx = match Context::new() {
        Ok(ctx) => ctx,
        Err(e) => {
            log::debug!("Unable to create IIO context: {e}");
            return None;
        }
    };

    for device in ctx.devices() {
        let Some(id) = device.id() else {
            continue;
        };
        let name = device.name().unwrap_or_default();
        let matches = match wanted {
            Some(wanted) => wanted == name || wanted == id,
            None => is_accelerometer_name(&name),
        };
        if !matches {
            log::trace!("Skipping IIO device {id} ({name})");
            continue;
        }
        if !device
            .channels()
            .any(|channel| channel.channel_type() == ChannelType::Accel)
        {
            log::debug!("IIO device {id} ({name}) has no accelerometer channels");
            continue;
        }
        log::debug!("Found IIO accelerometer {id} ({name})");
        return Some(DeviceId { id, name });
    }

    None
}

/// Driver for reading accelerometer data from an IIO device
pub struct Driver {
    mount_matrix: MountMatrix,
    accel: HashMap<String, Channel>,
    accel_info: HashMap<String, AxisInfo>,
}

impl Driver {
    pub fn new(
        device_id: &DeviceId,
        matrix: Option<MountMatrix>,
    ) -> Result<Self, Box<dyn Error + Send + Sync>> {
        log::debug!("Creating IIO accelerometer driver for {}", device_id.name);

        let ctx = Context::new()?;
        log::debug!("IIO context version: {}", ctx.version());
        let Some(device) = ctx.find_device(device_id.id.as_str()) else {
            return Err(format!("failed to find IIO device {}", device_id.id).into());
        };

        // Prefer a configured mount matrix, then the one reported by the kernel
        let mount_matrix = if let Some(matrix) = matrix {
            matrix
        } else if let Some(mount) = device.find_channel("mount", false) {
            let matrix_str = mount.attr_read_str("matrix")?;
            log::debug!("Found mount matrix: {matrix_str}");
            MountMatrix::new(matrix_str.as_str())?
        } else {
            MountMatrix::default()
        };
        log::debug!("Using mount matrix: {mount_matrix}");

        let (accel, accel_info) = get_accel_channels(&device);
        if accel.is_empty() {
            return Err(format!("no accelerometer channels on {}", device_id.id).into());
        }

        Ok(Self {
            mount_matrix,
            accel,
            accel_info,
        })
    }

    /// Sampling frequency of the device in Hz, if the kernel reports one
    pub fn sample_rate(&self) -> Option<f64> {
        device_sample_rate(self.accel_info.values())
    }

    /// Read all accelerometer channels and return the rotated reading
    pub fn poll(&self) -> Result<AxisData, Box<dyn Error + Send + Sync>> {
        let mut data = AxisData::default();
        for (id, channel) in self.accel.iter() {
            let Some(info) = self.accel_info.get(id) else {
                continue;
            };
            let value = info.process(channel.attr_read_int("raw")?);
            if id.ends_with('x') {
                data.x = value;
            } else if id.ends_with('y') {
                data.y = value;
            } else if id.ends_with('z') {
                data.z = value;
            }
        }

        let (x, y, z) = self.mount_matrix.rotate(data.x, data.y, data.z);
        log::trace!("Accelerometer reading: x={x}, y={y}, z={z}");
        Ok(AxisData::new(x, y, z))
    }
}

/// Returns the accelerometer channels and their scale information
fn get_accel_channels(device: &Device) -> (HashMap<String, Channel>, HashMap<String, AxisInfo>) {
    let mut channels = HashMap::new();
    let mut channel_info = HashMap::new();
    device
        .channels()
        .filter(|channel| channel.channel_type() == ChannelType::Accel)
        .for_each(|channel| {
            let Some(id) = channel.id() else {
                log::warn!("Unable to get channel id for channel: {:?}", channel);
                return;
            };

            let offset = match channel.attr_read_int("offset") {
                Ok(v) => v,
                Err(e) => {
                    log::debug!("Unable to read offset for channel {id}: {:?}", e);
                    0
                }
            };

            let scale = match channel.attr_read_float("scale") {
                Ok(v) => v,
                Err(e) => {
                    log::warn!("Unable to read scale for channel {id}: {:?}", e);
                    1.0
                }
            };

            let sample_rate = channel.attr_read_float("sampling_frequency").ok();

            log::debug!("Found accel channel {id}: offset={offset} scale={scale} sample_rate={sample_rate:?}");
            channel_info.insert(
                id.clone(),
                AxisInfo {
                    offset,
                    scale,
                    sample_rate,
                },
            );
            channels.insert(id, channel);
        });

    (channels, channel_info)
}
