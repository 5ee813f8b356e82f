use nasadem::{is_void, Elev, C};

/// Returns `raw` with void samples replaced by interpolated
/// elevations.
///
/// `raw` is ordered nearest first and is scanned from the far end.
/// A run of voids between two good samples is filled linearly from
/// the nearer to the farther one. A run at the far end is
/// interpolated toward `default`, as if it were the sample beyond the
/// end. A run at the near end has no nearer neighbor and repeats the
/// nearest good sample.
pub fn fill_voids(raw: &[Elev], default: Elev) -> Vec<Elev> {
    let mut filled = raw.to_vec();
    let mut last_good = default;
    let mut run = 0;

    for (index, &current) in raw.iter().enumerate().rev() {
        if is_void(current) {
            run += 1;
            continue;
        }
        if run > 0 {
            let increment = (C::from(last_good) - C::from(current)) / (run + 1) as C;
            for step in 1..=run {
                #[allow(clippy::cast_possible_truncation)]
                let value = (C::from(current) + increment * step as C).round() as Elev;
                filled[index + step] = value;
            }
        }
        last_good = current;
        run = 0;
    }

    for slot in filled.iter_mut().take(run) {
        *slot = last_good;
    }

    filled
}
