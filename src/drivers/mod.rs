pub mod iio_imu;
