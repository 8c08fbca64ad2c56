//! Status and category enums stored as constrained TEXT columns.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const VALUES: &'static [&'static str] = &[$($value),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($value) {
                        return Ok($name::$variant);
                    }
                )+
                Err(format!(
                    "invalid {}: {} (expected one of {})",
                    stringify!($name),
                    s,
                    Self::VALUES.join(", ")
                ))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

string_enum!(
    /// Lifecycle of a job posting. Listings show `Active` unless asked otherwise.
    JobStatus {
        Active => "Active",
        Draft => "Draft",
        Expired => "Expired",
        Closed => "Closed",
    }
);

string_enum!(JobType {
    FullTime => "Full-time",
    PartTime => "Part-time",
    Contract => "Contract",
    Internship => "Internship",
    Freelance => "Freelance",
    Temporary => "Temporary",
});

string_enum!(ExperienceLevel {
    Entry => "Entry",
    Mid => "Mid",
    Senior => "Senior",
    Lead => "Lead",
    Executive => "Executive",
});

string_enum!(ApplicationStatus {
    Pending => "Pending",
    Reviewed => "Reviewed",
    Interview => "Interview",
    Rejected => "Rejected",
    Hired => "Hired",
});

string_enum!(
    /// Editorial state of a blog post.
    BlogStatus {
        Draft => "Draft",
        Published => "Published",
        Archived => "Archived",
    }
);

pub const COMPANY_SIZES: &[&str] = &["1-10", "11-50", "51-200", "201-500", "501-1000", "1000+"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("active".parse::<JobStatus>().unwrap(), JobStatus::Active);
        assert_eq!("FULL-TIME".parse::<JobType>().unwrap(), JobType::FullTime);
        assert!("Archived".parse::<JobStatus>().is_err());
    }

    #[test]
    fn serializes_to_stored_value() {
        assert_eq!(serde_json::to_value(JobType::PartTime).unwrap(), "Part-time");
        let s: BlogStatus = serde_json::from_value(serde_json::json!("published")).unwrap();
        assert_eq!(s, BlogStatus::Published);
    }
}
