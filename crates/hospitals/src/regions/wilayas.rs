//! Static wilaya bounding boxes (OSM admin_level=4).
//!
//! Format: `(code, [south, west, north, east])`.

pub(super) const WILAYAS: [(&str, [f64; 4]); 58] = [
    ("01", [35.4607, -1.3588, 35.9780, -0.5214]),
    ("02", [36.4931, 1.4724, 36.8981, 2.1134]),
    ("03", [26.9991, 8.1689, 32.0001, 12.0000]),
    ("04", [35.5370, -0.7617, 36.1674, 0.0971]),
    ("05", [35.9537, 4.7665, 36.5905, 5.4147]),
    ("06", [33.8062, 0.1076, 34.7598, 1.4118]),
    ("07", [34.6390, 5.8026, 35.5073, 6.8554]),
    ("08", [34.4500, 2.2400, 35.0500, 3.3000]),
    ("09", [36.3086, 4.2000, 36.7663, 5.0878]),
    ("10", [34.8003, 0.5002, 35.0373, 1.1252]),
    ("11", [36.1685, 3.7870, 36.8990, 4.8777]),
    ("12", [35.5300, -0.5000, 36.1200, 0.3500]),
    ("13", [36.5980, 2.7000, 37.1500, 3.3000]),
    ("14", [35.7820, 3.9400, 36.4200, 4.7800]),
    ("15", [36.4770, 3.9200, 36.8600, 4.5300]),
    ("16", [36.6222, 2.7542, 36.8800, 3.2561]),
    ("17", [34.7600, 2.4500, 35.3500, 3.3000]),
    ("18", [36.4000, 4.7000, 36.9000, 5.3500]),
    ("19", [36.5800, 5.0900, 37.0000, 5.6500]),
    ("20", [35.9500, 4.0000, 36.6000, 4.9000]),
    ("21", [36.2500, 5.0500, 36.9000, 5.7000]),
    ("22", [36.0542, 1.1532, 36.5789, 2.1420]),
    ("23", [36.8000, 7.5000, 37.1000, 7.9000]),
    ("24", [36.3300, 7.0800, 36.9000, 7.8500]),
    ("25", [36.7000, 5.6384, 37.0800, 6.4500]),
    ("26", [36.2120, 4.8160, 36.6800, 5.5000]),
    ("27", [35.6500, 1.4480, 36.1500, 2.4500]),
    ("28", [35.0000, 1.8000, 35.7000, 3.0000]),
    ("29", [36.0000, 1.0000, 36.7000, 1.9800]),
    ("30", [35.9500, 5.8500, 36.5000, 6.9000]),
    ("31", [35.5700, -1.1000, 36.2300, -0.2000]),
    ("32", [35.7300, 6.9200, 36.2000, 7.5000]),
    ("33", [28.5000, 0.5000, 33.0000, 6.5000]),
    ("34", [36.1500, 3.0000, 36.7500, 4.1500]),
    ("35", [36.4300, 5.2500, 36.9000, 6.1500]),
    ("36", [35.8400, 7.1000, 36.4000, 7.9000]),
    ("37", [35.3000, 1.9300, 36.5000, 3.3000]),
    ("38", [34.5000, 4.5000, 35.7500, 5.7500]),
    ("39", [35.1000, 3.6000, 35.9000, 4.9000]),
    ("40", [34.6000, 5.4000, 35.6000, 6.4500]),
    ("41", [36.0000, 6.1000, 36.7500, 7.2000]),
    ("42", [34.9000, 1.0000, 35.8000, 2.3000]),
    ("43", [35.8500, 0.4500, 36.7000, 1.4500]),
    ("44", [34.3000, 2.5000, 35.2000, 3.5000]),
    ("45", [35.9000, 7.5000, 36.4000, 8.2000]),
    ("46", [35.0000, 2.3000, 35.9000, 3.6000]),
    ("47", [33.0000, -1.0000, 34.6000, 1.2000]),
    ("48", [35.5000, 8.0000, 36.1000, 9.3000]),
    ("49", [29.5000, -0.2000, 31.0000, 2.0000]),
    ("50", [26.0000, 1.0000, 28.5000, 6.5000]),
    ("51", [34.0000, -1.5000, 35.2000, 0.0000]),
    ("52", [32.0000, 4.0000, 33.8000, 6.0000]),
    ("53", [36.1000, 0.4000, 36.8000, 1.4000]),
    ("54", [32.5000, 5.5000, 34.2000, 8.0000]),
    ("55", [36.3000, 4.5000, 36.9000, 5.8000]),
    ("56", [30.0000, 3.0000, 32.0000, 5.5000]),
    ("57", [34.5000, 3.5000, 35.9000, 6.0000]),
    ("58", [33.5000, 1.5000, 34.9000, 3.5000]),
];
