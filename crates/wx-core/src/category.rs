use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown hazard category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

/// Declares a closed enumeration backed by the NWS/SPC display strings.
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal,)+ }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownCategory;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let value = value.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.as_str().eq_ignore_ascii_case(value))
                    .ok_or_else(|| UnknownCategory(value.to_string()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = String::deserialize(deserializer)?;
                value.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

string_enum! {
    /// NWS alert event types.
    AlertType {
        TelephoneOutageEmergency911 => "911 Telephone Outage Emergency",
        AdministrativeMessage => "Administrative Message",
        AirQualityAlert => "Air Quality Alert",
        AirStagnationAdvisory => "Air Stagnation Advisory",
        ArroyoAndSmallStreamFloodAdvisory => "Arroyo And Small Stream Flood Advisory",
        AshfallAdvisory => "Ashfall Advisory",
        AshfallWarning => "Ashfall Warning",
        AvalancheAdvisory => "Avalanche Advisory",
        AvalancheWarning => "Avalanche Warning",
        AvalancheWatch => "Avalanche Watch",
        BeachHazardsStatement => "Beach Hazards Statement",
        BlizzardWarning => "Blizzard Warning",
        BlizzardWatch => "Blizzard Watch",
        BlowingDustAdvisory => "Blowing Dust Advisory",
        BlowingDustWarning => "Blowing Dust Warning",
        BriskWindAdvisory => "Brisk Wind Advisory",
        ChildAbductionEmergency => "Child Abduction Emergency",
        CivilDangerWarning => "Civil Danger Warning",
        CivilEmergencyMessage => "Civil Emergency Message",
        CoastalFloodAdvisory => "Coastal Flood Advisory",
        CoastalFloodStatement => "Coastal Flood Statement",
        CoastalFloodWarning => "Coastal Flood Warning",
        CoastalFloodWatch => "Coastal Flood Watch",
        DenseFogAdvisory => "Dense Fog Advisory",
        DenseSmokeAdvisory => "Dense Smoke Advisory",
        DustAdvisory => "Dust Advisory",
        DustStormWarning => "Dust Storm Warning",
        EarthquakeWarning => "Earthquake Warning",
        EvacuationImmediate => "Evacuation - Immediate",
        ExcessiveHeatWarning => "Excessive Heat Warning",
        ExcessiveHeatWatch => "Excessive Heat Watch",
        ExtremeColdWarning => "Extreme Cold Warning",
        ExtremeColdWatch => "Extreme Cold Watch",
        ExtremeFireDanger => "Extreme Fire Danger",
        ExtremeWindWarning => "Extreme Wind Warning",
        FireWarning => "Fire Warning",
        FireWeatherWatch => "Fire Weather Watch",
        FlashFloodStatement => "Flash Flood Statement",
        FlashFloodWarning => "Flash Flood Warning",
        FlashFloodWatch => "Flash Flood Watch",
        FloodAdvisory => "Flood Advisory",
        FloodStatement => "Flood Statement",
        FloodWarning => "Flood Warning",
        FloodWatch => "Flood Watch",
        FreezeWarning => "Freeze Warning",
        FreezeWatch => "Freeze Watch",
        FreezingFogAdvisory => "Freezing Fog Advisory",
        FreezingRainAdvisory => "Freezing Rain Advisory",
        FreezingSprayAdvisory => "Freezing Spray Advisory",
        FrostAdvisory => "Frost Advisory",
        GaleWarning => "Gale Warning",
        GaleWatch => "Gale Watch",
        HardFreezeWarning => "Hard Freeze Warning",
        HardFreezeWatch => "Hard Freeze Watch",
        HazardousMaterialsWarning => "Hazardous Materials Warning",
        HazardousSeasWarning => "Hazardous Seas Warning",
        HazardousSeasWatch => "Hazardous Seas Watch",
        HazardousWeatherOutlook => "Hazardous Weather Outlook",
        HeatAdvisory => "Heat Advisory",
        HeavyFreezingSprayWarning => "Heavy Freezing Spray Warning",
        HeavyFreezingSprayWatch => "Heavy Freezing Spray Watch",
        HighSurfAdvisory => "High Surf Advisory",
        HighSurfWarning => "High Surf Warning",
        HighWindWarning => "High Wind Warning",
        HighWindWatch => "High Wind Watch",
        HurricaneForceWindWarning => "Hurricane Force Wind Warning",
        HurricaneForceWindWatch => "Hurricane Force Wind Watch",
        HurricaneLocalStatement => "Hurricane Local Statement",
        HurricaneWarning => "Hurricane Warning",
        HurricaneWatch => "Hurricane Watch",
        HydrologicAdvisory => "Hydrologic Advisory",
        HydrologicOutlook => "Hydrologic Outlook",
        IceStormWarning => "Ice Storm Warning",
        LakeEffectSnowAdvisory => "Lake Effect Snow Advisory",
        LakeEffectSnowWarning => "Lake Effect Snow Warning",
        LakeEffectSnowWatch => "Lake Effect Snow Watch",
        LakeWindAdvisory => "Lake Wind Advisory",
        LakeshoreFloodAdvisory => "Lakeshore Flood Advisory",
        LakeshoreFloodStatement => "Lakeshore Flood Statement",
        LakeshoreFloodWarning => "Lakeshore Flood Warning",
        LakeshoreFloodWatch => "Lakeshore Flood Watch",
        LawEnforcementWarning => "Law Enforcement Warning",
        LocalAreaEmergency => "Local Area Emergency",
        LowWaterAdvisory => "Low Water Advisory",
        MarineWeatherStatement => "Marine Weather Statement",
        NuclearPowerPlantWarning => "Nuclear Power Plant Warning",
        RadiologicalHazardWarning => "Radiological Hazard Warning",
        RedFlagWarning => "Red Flag Warning",
        RipCurrentStatement => "Rip Current Statement",
        SevereThunderstormWarning => "Severe Thunderstorm Warning",
        SevereThunderstormWatch => "Severe Thunderstorm Watch",
        SevereWeatherStatement => "Severe Weather Statement",
        ShelterInPlaceWarning => "Shelter In Place Warning",
        ShortTermForecast => "Short Term Forecast",
        SmallCraftAdvisory => "Small Craft Advisory",
        SmallCraftAdvisoryForHazardousSeas => "Small Craft Advisory For Hazardous Seas",
        SmallCraftAdvisoryForRoughBar => "Small Craft Advisory For Rough Bar",
        SmallCraftAdvisoryForWinds => "Small Craft Advisory For Winds",
        SmallStreamFloodAdvisory => "Small Stream Flood Advisory",
        SnowSquallWarning => "Snow Squall Warning",
        SpecialMarineWarning => "Special Marine Warning",
        SpecialWeatherStatement => "Special Weather Statement",
        StormSurgeWarning => "Storm Surge Warning",
        StormSurgeWatch => "Storm Surge Watch",
        StormWarning => "Storm Warning",
        StormWatch => "Storm Watch",
        Test => "Test",
        TornadoWarning => "Tornado Warning",
        TornadoWatch => "Tornado Watch",
        TropicalDepressionLocalStatement => "Tropical Depression Local Statement",
        TropicalStormLocalStatement => "Tropical Storm Local Statement",
        TropicalStormWarning => "Tropical Storm Warning",
        TropicalStormWatch => "Tropical Storm Watch",
        TsunamiAdvisory => "Tsunami Advisory",
        TsunamiWarning => "Tsunami Warning",
        TsunamiWatch => "Tsunami Watch",
        TyphoonLocalStatement => "Typhoon Local Statement",
        TyphoonWarning => "Typhoon Warning",
        TyphoonWatch => "Typhoon Watch",
        UrbanAndSmallStreamFloodAdvisory => "Urban And Small Stream Flood Advisory",
        VolcanoWarning => "Volcano Warning",
        WindAdvisory => "Wind Advisory",
        WindChillAdvisory => "Wind Chill Advisory",
        WindChillWarning => "Wind Chill Warning",
        WindChillWatch => "Wind Chill Watch",
        WinterStormWarning => "Winter Storm Warning",
        WinterStormWatch => "Winter Storm Watch",
        WinterWeatherAdvisory => "Winter Weather Advisory",
    }
}

string_enum! {
    /// SPC convective outlook products.
    ConvectiveOutlookType {
        Day1Categorical => "Day 1 Categorical",
        Day1Tornado => "Day 1 Tornado",
        Day1Wind => "Day 1 Wind",
        Day1Hail => "Day 1 Hail",
        Day1SignificantTornado => "Day 1 Significant Tornado",
        Day1SignificantWind => "Day 1 Significant Wind",
        Day1SignificantHail => "Day 1 Significant Hail",
        Day2Categorical => "Day 2 Categorical",
        Day2Tornado => "Day 2 Tornado",
        Day2Wind => "Day 2 Wind",
        Day2Hail => "Day 2 Hail",
        Day2SignificantTornado => "Day 2 Significant Tornado",
        Day2SignificantWind => "Day 2 Significant Wind",
        Day2SignificantHail => "Day 2 Significant Hail",
        Day3Categorical => "Day 3 Categorical",
        Day3Probabilistic => "Day 3 Probabilistic",
        Day3SignificantProbabilistic => "Day 3 Significant Probabilistic",
        Day4Probabilistic => "Day 4 Probabilistic",
        Day5Probabilistic => "Day 5 Probabilistic",
        Day6Probabilistic => "Day 6 Probabilistic",
        Day7Probabilistic => "Day 7 Probabilistic",
        Day8Probabilistic => "Day 8 Probabilistic",
    }
}

/// What a hazard is, and what a location opts into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardCategory {
    Alert(AlertType),
    ConvectiveOutlook(ConvectiveOutlookType),
    MesoscaleDiscussion,
}

impl HazardCategory {
    pub fn family(&self) -> &'static str {
        match self {
            Self::Alert(_) => "alert",
            Self::ConvectiveOutlook(_) => "convective_outlook",
            Self::MesoscaleDiscussion => "mesoscale_discussion",
        }
    }
}

impl fmt::Display for HazardCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alert(kind) => write!(f, "alert:{kind}"),
            Self::ConvectiveOutlook(kind) => write!(f, "convective_outlook:{kind}"),
            Self::MesoscaleDiscussion => f.write_str("mesoscale_discussion"),
        }
    }
}

impl From<AlertType> for HazardCategory {
    fn from(value: AlertType) -> Self {
        Self::Alert(value)
    }
}

impl From<ConvectiveOutlookType> for HazardCategory {
    fn from(value: ConvectiveOutlookType) -> Self {
        Self::ConvectiveOutlook(value)
    }
}
