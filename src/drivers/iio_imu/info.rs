use std::{error::Error, fmt};

use glob_match::glob_match;

use crate::{config, constants::IIO_ACCEL_NAME_GLOB};

/// The [MountMatrix] is used to define how sensors are oriented inside a device
/// https://github.com/torvalds/linux/blob/master/Documentation/devicetree/bindings/iio/mount-matrix.txt
#[derive(Clone, Debug, PartialEq)]
pub struct MountMatrix {
    pub x: (f64, f64, f64),
    pub y: (f64, f64, f64),
    pub z: (f64, f64, f64),
}

impl MountMatrix {
    /// Parse a [MountMatrix] from the sysfs string representation
    /// Example:
    /// "1, 0, 0; 0, 1, 0; 0, 0, 1"
    pub fn new(matrix_str: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let rows: Vec<&str> = matrix_str.split(';').map(str::trim).collect();
        let [x, y, z] = rows.as_slice() else {
            return Err(format!("expected 3 rows in mount matrix, found {}", rows.len()).into());
        };

        Ok(Self {
            x: parse_row(x)?,
            y: parse_row(y)?,
            z: parse_row(z)?,
        })
    }

    /// Rotate the given vector according to the mount matrix.
    // Values are multiplied as:
    //   x' = mxx * x + myx * y + mzx * z
    //   y' = mxy * x + myy * y + mzy * z
    //   z' = mxz * x + myz * y + mzz * z
    pub fn rotate(&self, x: f64, y: f64, z: f64) -> (f64, f64, f64) {
        let (mxx, myx, mzx) = self.x;
        let (mxy, myy, mzy) = self.y;
        let (mxz, myz, mzz) = self.z;
        (
            mxx * x + myx * y + mzx * z,
            mxy * x + myy * y + mzy * z,
            mxz * x + myz * y + mzz * z,
        )
    }
}

fn parse_row(row: &str) -> Result<(f64, f64, f64), Box<dyn Error + Send + Sync>> {
    let values = row
        .split(',')
        .map(|value| value.trim().parse::<f64>())
        .collect::<Result<Vec<f64>, _>>()?;
    let [a, b, c] = values.as_slice() else {
        return Err(format!("expected 3 values in mount matrix row '{row}'").into());
    };
    Ok((*a, *b, *c))
}

impl Default for MountMatrix {
    fn default() -> Self {
        MountMatrix {
            x: (1.0, 0.0, 0.0),
            y: (0.0, 1.0, 0.0),
            z: (0.0, 0.0, 1.0),
        }
    }
}

impl From<&config::MountMatrix> for MountMatrix {
    fn from(matrix: &config::MountMatrix) -> Self {
        let [xx, xy, xz] = matrix.x;
        let [yx, yy, yz] = matrix.y;
        let [zx, zy, zz] = matrix.z;
        Self {
            x: (xx, xy, xz),
            y: (yx, yy, yz),
            z: (zx, zy, zz),
        }
    }
}

impl fmt::Display for MountMatrix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}; {}, {}, {}; {}, {}, {}",
            self.x.0, self.x.1, self.x.2, self.y.0, self.y.1, self.y.2, self.z.0, self.z.1, self.z.2,
        )
    }
}

/// The scale and offset information for a particular axis. These are used to
/// normalize data into real units.
///   processed_value = (raw + offset) * scale
#[derive(Clone, Debug)]
pub struct AxisInfo {
    pub offset: i64,
    pub scale: f64,
    pub sample_rate: Option<f64>,
}

impl AxisInfo {
    pub fn process(&self, raw: i64) -> f64 {
        (raw + self.offset) as f64 * self.scale
    }
}

/// Lowest sampling frequency reported across the given axes, if any axis
/// reports one. A device cannot produce fresh readings faster than this.
pub fn device_sample_rate<'a>(axes: impl IntoIterator<Item = &'a AxisInfo>) -> Option<f64> {
    axes.into_iter()
        .filter_map(|axis| axis.sample_rate)
        .filter(|rate| rate.is_finite() && *rate > 0.0)
        .reduce(f64::min)
}

/// Returns true if the given IIO device name looks like an accelerometer
pub fn is_accelerometer_name(name: &str) -> bool {
    glob_match(IIO_ACCEL_NAME_GLOB, name)
}
