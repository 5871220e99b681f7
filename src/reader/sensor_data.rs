/// Overtones recorded for every sensor, in column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Harmonic {
    F3,
    F5,
    F7,
    F9,
    F11,
    F13,
}

impl Harmonic {
    pub const ALL: [Harmonic; 6] = [
        Harmonic::F3,
        Harmonic::F5,
        Harmonic::F7,
        Harmonic::F9,
        Harmonic::F11,
        Harmonic::F13,
    ];

    pub fn index(self) -> usize {
        match self {
            Harmonic::F3 => 0,
            Harmonic::F5 => 1,
            Harmonic::F7 => 2,
            Harmonic::F9 => 3,
            Harmonic::F11 => 4,
            Harmonic::F13 => 5,
        }
    }

    pub fn overtone(self) -> u8 {
        2 * self.index() as u8 + 3
    }

    /// `F5` for frequency, `D5` for dissipation.
    pub fn label(self, channel: Channel) -> String {
        format!("{}{}", channel.prefix(), self.overtone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Frequency,
    Dissipation,
}

impl Channel {
    pub const ALL: [Channel; 2] = [Channel::Frequency, Channel::Dissipation];

    pub fn index(self) -> usize {
        match self {
            Channel::Frequency => 0,
            Channel::Dissipation => 1,
        }
    }

    pub fn prefix(self) -> char {
        match self {
            Channel::Frequency => 'F',
            Channel::Dissipation => 'D',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Channel::Frequency => "Frequency",
            Channel::Dissipation => "Dissipation",
        }
    }

    pub fn axis_label(self) -> &'static str {
        match self {
            Channel::Frequency => "Δf (Hz)",
            Channel::Dissipation => "ΔD (1e-6)",
        }
    }
}

/// One sensor's time series. Every channel has the same length as `time`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorReading {
    pub time: Vec<f64>,
    pub frequency: [Vec<f64>; 6],
    pub dissipation: [Vec<f64>; 6],
}

impl SensorReading {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Appends one sample. Callers hand over complete rows only, which keeps
    /// all channels the same length.
    pub fn push_sample(&mut self, time: f64, frequency: [f64; 6], dissipation: [f64; 6]) {
        self.time.push(time);
        for (channel, value) in self.frequency.iter_mut().zip(frequency) {
            channel.push(value);
        }
        for (channel, value) in self.dissipation.iter_mut().zip(dissipation) {
            channel.push(value);
        }
    }

    pub fn channel(&self, channel: Channel) -> &[Vec<f64>; 6] {
        match channel {
            Channel::Frequency => &self.frequency,
            Channel::Dissipation => &self.dissipation,
        }
    }

    pub fn harmonic(&self, channel: Channel, harmonic: Harmonic) -> &[f64] {
        &self.channel(channel)[harmonic.index()]
    }

    pub fn time_domain(&self) -> Option<(f64, f64)> {
        let first = *self.time.first()?;
        let (min, max) = self
            .time
            .iter()
            .fold((first, first), |(min, max), &t| (min.min(t), max.max(t)));
        Some((min, max))
    }

    /// Index of the sample whose time is closest to `x`.
    pub fn nearest_index(&self, x: f64) -> Option<usize> {
        nearest_index(&self.time, x)
    }

    /// Shifts every frequency and dissipation channel so it starts at zero.
    pub fn normalise(&mut self) {
        for data in self.frequency.iter_mut().chain(self.dissipation.iter_mut()) {
            if let Some(&zero) = data.first() {
                for value in data.iter_mut() {
                    *value -= zero;
                }
            }
        }
    }
}

/// Index of the value in `values` closest to `x`, first one wins on ties.
pub fn nearest_index(values: &[f64], x: f64) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .fold(None, |best: Option<(usize, f64)>, (index, &v)| {
            let distance = (v - x).abs();
            match best {
                Some((_, best_distance)) if best_distance <= distance => best,
                _ => Some((index, distance)),
            }
        })
        .map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading() -> SensorReading {
        let mut reading = SensorReading::new();
        reading.push_sample(0.0, [10.0; 6], [1.0; 6]);
        reading.push_sample(1.0, [8.0; 6], [1.5; 6]);
        reading.push_sample(2.0, [5.0; 6], [2.5; 6]);
        reading
    }

    #[test]
    fn harmonic_labels_follow_channel() {
        assert_eq!(Harmonic::F3.label(Channel::Frequency), "F3");
        assert_eq!(Harmonic::F13.label(Channel::Dissipation), "D13");
        assert_eq!(Harmonic::F9.overtone(), 9);
    }

    #[test]
    fn channels_stay_the_same_length() {
        let reading = reading();
        assert_eq!(reading.len(), 3);
        for harmonic in Harmonic::ALL {
            assert_eq!(reading.harmonic(Channel::Frequency, harmonic).len(), 3);
            assert_eq!(reading.harmonic(Channel::Dissipation, harmonic).len(), 3);
        }
    }

    #[test]
    fn normalise_zeroes_the_first_sample() {
        let mut reading = reading();
        reading.normalise();
        assert_eq!(reading.time, vec![0.0, 1.0, 2.0]);
        assert_eq!(reading.frequency[0], vec![0.0, -2.0, -5.0]);
        assert_eq!(reading.dissipation[5], vec![0.0, 0.5, 1.5]);
    }

    #[test]
    fn nearest_index_picks_closest_sample() {
        let reading = reading();
        assert_eq!(reading.nearest_index(-4.0), Some(0));
        assert_eq!(reading.nearest_index(1.4), Some(1));
        assert_eq!(reading.nearest_index(1.6), Some(2));
        assert_eq!(reading.nearest_index(99.0), Some(2));
        assert_eq!(SensorReading::new().nearest_index(1.0), None);
    }

    #[test]
    fn time_domain_spans_all_samples() {
        assert_eq!(reading().time_domain(), Some((0.0, 2.0)));
        assert_eq!(SensorReading::new().time_domain(), None);
    }
}
