//! Canonical vocabulary enums and alias resolution.
//!
//! Every domain concept the filter language can name (comparison operators,
//! logical operators, sex, stroke subtype, boolean clinical properties, KPIs,
//! grouping dimensions) is a closed enum here. Each member owns a canonical
//! backend spelling plus a set of lowercase aliases, and `resolve` maps
//! free-form text onto a member by exact case-insensitive match. The tables
//! are `'static`, so the registry is immutable and safe to read from any
//! thread without coordination.

use std::fmt;

/// Defines an enum whose members resolve from a canonical spelling and a set
/// of lowercase aliases.
macro_rules! alias_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($family:literal) {
            $( $variant:ident => $canonical:literal $(, [ $($alias:literal),* $(,)? ])? ; )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                #[doc = concat!("Backend value `", $canonical, "`.")]
                $variant,
            )+
        }

        impl $name {
            /// Family name used in diagnostics.
            pub const FAMILY: &'static str = $family;

            /// All members, in declaration order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )+ ];

            /// Canonical backend spelling for this member.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $canonical, )+
                }
            }

            /// Variant name, for diagnostics.
            pub fn name(&self) -> &'static str {
                match self {
                    $( $name::$variant => stringify!($variant), )+
                }
            }

            /// Lowercase aliases accepted by [`resolve`](Self::resolve),
            /// not including the canonical spelling.
            pub fn aliases(&self) -> &'static [&'static str] {
                match self {
                    $( $name::$variant => &[ $($( $alias, )*)? ], )+
                }
            }

            /// Resolves trimmed, case-folded text against the canonical
            /// spelling and alias set of every member.
            pub fn resolve(text: &str) -> $crate::error::FilterResult<Self> {
                let needle = text.trim().to_ascii_lowercase();
                for member in Self::ALL {
                    if member.as_str().eq_ignore_ascii_case(&needle)
                        || member.aliases().contains(&needle.as_str())
                    {
                        return Ok(*member);
                    }
                }
                Err($crate::error::FilterError::UnknownAlias {
                    family: Self::FAMILY,
                    value: text.to_string(),
                })
            }

            /// Renders every member with its accepted spellings, for
            /// diagnostics and prompt construction.
            pub fn describe_choices() -> String {
                Self::ALL
                    .iter()
                    .map(|member| {
                        let mut aliases: Vec<&str> = member.aliases().to_vec();
                        aliases.sort_unstable();
                        let mut spellings = vec![member.as_str()];
                        spellings.extend(aliases);
                        format!("{} (aliases: {})", member.name(), spellings.join(", "))
                    })
                    .collect::<Vec<_>>()
                    .join("; ")
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::FilterError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::resolve(s)
            }
        }

        #[cfg(feature = "serde")]
        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = String::deserialize(deserializer)?;
                Self::resolve(&text).map_err(serde::de::Error::custom)
            }
        }
    };
}

alias_enum! {
    /// Comparison operators for numeric and date conditions.
    pub enum Comparison ("comparison operator") {
        Ge => "GE", ["greater than or equal", "at least", "no less than", "≥", ">=", "=>"];
        Le => "LE", ["less than or equal", "at most", "no more than", "≤", "<="];
        Lt => "LT", ["less than", "fewer than", "<", "below"];
        Gt => "GT", ["greater than", "more than", ">", "above"];
        Eq => "EQ", ["equal to", "equals", "==", "is"];
        Ne => "NE", ["not equal to", "not equals", "!=", "is not"];
    }
}

alias_enum! {
    /// Logical combinators over filter nodes.
    pub enum LogicalOp ("logical operator") {
        And => "AND", ["&", "&&"];
        Or => "OR", ["|", "||"];
        Not => "NOT", ["!", "!=", "=!", "!!"];
    }
}

alias_enum! {
    /// Patient sex.
    pub enum SexType ("sex") {
        Male => "MALE", ["man", "m"];
        Female => "FEMALE", ["woman", "f"];
        Other => "OTHER", ["non-binary", "genderqueer", "agender", "genderfluid"];
        Unknown => "UNKNOWN", ["unspecified", "not provided", "n/a", "na"];
    }
}

alias_enum! {
    /// Clinical stroke subtype.
    pub enum StrokeType ("stroke type") {
        Ischemic => "ISCHEMIC", ["ischemic stroke", "clot stroke", "blockage stroke"];
        IntracerebralHemorrhage => "INTRACEREBRAL_HEMORRHAGE", ["ich", "brain bleed", "intracerebral bleeding", "intraparenchymal hemorrhage"];
        TransientIschemic => "TRANSIENT_ISCHEMIC", ["tia", "mini stroke", "transient ischemic attack"];
        SubarachnoidHemorrhage => "SUBARACHNOID_HEMORRHAGE", ["sah", "aneurysm rupture", "subarachnoid bleed"];
        CerebralVenousThrombosis => "CEREBRAL_VENOUS_THROMBOSIS", ["cvt", "venous stroke", "cerebral vein clot"];
        StrokeMimics => "STROKE_MIMICS", ["mimics", "stroke-like symptoms", "not a real stroke", "conversion disorder"];
        Undetermined => "UNDETERMINED", ["unknown stroke type", "unspecified", "unclear diagnosis"];
    }
}

alias_enum! {
    /// Named yes/no clinical properties a case can be filtered on.
    pub enum BooleanProperty ("boolean clinical property") {
        Thrombectomy => "THROMBECTOMY", ["clot removal", "mechanical thrombectomy", "embolectomy"];
        Thrombolysis => "THROMBOLYSIS", ["tpa", "alteplase", "clot-busting drug", "lysis treatment"];
        BeforeOnsetCilostazol => "BEFORE_ONSET_CILOSTAZOL", ["cilostazol before onset"];
        BeforeOnsetClopidogrel => "BEFORE_ONSET_CLOPIDOGREL", ["plavix", "clopidogrel before stroke"];
        BeforeOnsetTicagrelor => "BEFORE_ONSET_TICAGRELOR", ["brilinta", "ticagrelor pre-stroke"];
        BeforeOnsetTiclopidine => "BEFORE_ONSET_TICLOPIDINE", ["ticlopidine before stroke"];
        BeforeOnsetPrasugrel => "BEFORE_ONSET_PRASUGREL", ["prasugrel before stroke"];
        BeforeOnsetDipyridamole => "BEFORE_ONSET_DIPYRIDAMOLE", ["dipyridamole pre-stroke"];
        BeforeOnsetOtherAntiplatelet => "BEFORE_ONSET_OTHER_ANTIPLATELET", ["other antiplatelet used", "unknown antiplatelet"];
        BeforeOnsetAnyAntiplatelet => "BEFORE_ONSET_ANY_ANTIPLATELET", ["on any antiplatelet", "antiplatelet therapy"];
        BeforeOnsetWarfarins => "BEFORE_ONSET_WARFARINS", ["warfarin", "coumadin"];
        BeforeOnsetDabigatran => "BEFORE_ONSET_DABIGATRAN", ["pradaxa", "dabigatran before stroke"];
        BeforeOnsetRivaroxaban => "BEFORE_ONSET_RIVAROXABAN", ["xarelto", "rivaroxaban pre-stroke"];
        BeforeOnsetApixaban => "BEFORE_ONSET_APIXABAN", ["eliquis", "apixaban before stroke"];
        BeforeOnsetEdoxaban => "BEFORE_ONSET_EDOXABAN", ["lixiana", "edoxaban pre-stroke"];
        BeforeOnsetOtherAnticoagulant => "BEFORE_ONSET_OTHER_ANTICOAGULANT", ["other anticoagulant used", "unknown blood thinner"];
        BeforeOnsetAnyAnticoagulant => "BEFORE_ONSET_ANY_ANTICOAGULANT", ["on any anticoagulant", "any blood thinner"];
        BeforeOnsetStatin => "BEFORE_ONSET_STATIN", ["on statin", "statin before stroke", "lipid lowering"];
        BeforeOnsetHeparin => "BEFORE_ONSET_HEPARIN", ["on heparin", "heparin before stroke"];
        BeforeOnsetContraception => "BEFORE_ONSET_CONTRACEPTION", ["on birth control", "hormonal contraception", "contraceptives before stroke"];
    }
}

alias_enum! {
    /// Server-side grouping dimensions for metric results.
    pub enum GroupBy ("group-by dimension") {
        EmsPrenotification => "EMS_PRENOTIFICATION", ["ems prenotification", "ems notified", "emergency pre-alert", "ambulance notified"];
        FirstContactPlace => "FIRST_CONTACT_PLACE", ["first contact place", "place of first contact", "initial point of contact", "first seen"];
        IvtApplicationDepartment => "IVT_APPLICATION_DEPARTMENT", ["ivt department", "thrombolysis department", "tpa department", "treatment department"];
        InrMode => "INR_MODE", ["inr measurement method", "coagulation mode", "how inr was measured", "inr method"];
    }
}

alias_enum! {
    /// Clinical metrics and key performance indicators the backend can
    /// compute statistics or distributions for.
    pub enum Kpi ("KPI") {
        AaDtnLe60 => "AA_DTN_LE60";
        AaDtnLe45 => "AA_DTN_LE45";
        AaDtgLe120 => "AA_DTG_LE120";
        AaDtgLe90 => "AA_DTG_LE90";
        AaRecanalization => "AA_RECANALIZATION";
        AaImaging => "AA_IMAGING";
        AaSwallowingScreening => "AA_SWALLOWING_SCREENING";
        AaAnticoagulants => "AA_ANTICOAGULANTS";
        AaAntithrombotics => "AA_ANTITHROMBOTICS";
        AaStrokeUnit => "AA_STROKE_UNIT";
        Age => "AGE", ["patient age", "years", "age of patient"];
        WakeupStroke => "WAKEUP_STROKE";
        InhospitalStroke => "INHOSPITAL_STROKE";
        ArrivalMode => "ARRIVAL_MODE";
        EmsPrenotification => "EMS_PRENOTIFICATION";
        AdmissionDepartment => "ADMISSION_DEPARTMENT";
        FirstContactPlace => "FIRST_CONTACT_PLACE";
        HospitalizedIn => "HOSPITALIZED_IN";
        Sex => "SEX";
        RiskFactorsType => "RISK_FACTORS_TYPE";
        BeforeOnsetMedication => "BEFORE_ONSET_MEDICATION";
        BeforeOnsetMedicationAisTia => "BEFORE_ONSET_MEDICATION_AIS_TIA";
        BeforeOnsetMedicationIch => "BEFORE_ONSET_MEDICATION_ICH";
        BeforeOnsetAntiplateletType => "BEFORE_ONSET_ANTIPLATELET_TYPE";
        BeforeOnsetAnticoagulantType => "BEFORE_ONSET_ANTICOAGULANT_TYPE";
        AdmissionNihss => "ADMISSION_NIHSS", ["stroke severity", "nihss", "initial nihss", "admission score"];
        PrestrokeMrs => "PRESTROKE_MRS";
        Glucose => "GLUCOSE";
        Cholesterol => "CHOLESTEROL";
        SystolicPressure => "SYSTOLIC_PRESSURE";
        DiastolicPressure => "DIASTOLIC_PRESSURE";
        InrMode => "INR_MODE";
        ImagingDone => "IMAGING_DONE";
        ImagingType => "IMAGING_TYPE";
        OcclusionFound => "OCCLUSION_FOUND";
        OcclusionSite => "OCCLUSION_SITE";
        OldInfarctsSeen => "OLD_INFARCTS_SEEN";
        OldInfarctsType => "OLD_INFARCTS_TYPE";
        PerfusionDeficitType => "PERFUSION_DEFICIT_TYPE";
        PerfusionCore => "PERFUSION_CORE";
        Hypoperfusion => "HYPOPERFUSION";
        StrokeType => "STROKE_TYPE", ["stroke subtype", "type of stroke", "stroke classification"];
        StrokeMimicsDiagnosis => "STROKE_MIMICS_DIAGNOSIS";
        Thrombolysis => "THROMBOLYSIS";
        Thrombectomy => "THROMBECTOMY";
        ThrombolysisOnly => "THROMBOLYSIS_ONLY";
        ThrombolysisAndThrombectomy => "THROMBOLYSIS_AND_THROMBECTOMY";
        Recanalization => "RECANALIZATION";
        Dtn => "DTN", ["door to needle", "door to needle time", "time to thrombolysis", "time until thrombolytic treatment", "time to iv tpa", "time to treatment", "treatment delay"];
        DtgPrimary => "DTG_PRIMARY";
        DtgSecondary => "DTG_SECONDARY";
        Dido => "DIDO", ["door in door out", "transfer delay", "time before transfer", "time spent before transfer", "time at initial hospital", "duration at referring hospital", "initial hospital stay time", "primary site delay", "door-to-door time"];
        DoorToReperfusion => "DOOR_TO_REPERFUSION";
        MticiScore => "MTICI_SCORE";
        NoThrombolysisReason => "NO_THROMBOLYSIS_REASON";
        NoThrombectomyReason => "NO_THROMBECTOMY_REASON";
        MtComplicationsType => "MT_COMPLICATIONS_TYPE";
        MtComplications => "MT_COMPLICATIONS";
        ThrombolysisDrugs => "THROMBOLYSIS_DRUGS";
        ThrombolysisDrugDose => "THROMBOLYSIS_DRUG_DOSE";
        ThrombolysisApplicationDepartment => "THROMBOLYSIS_APPLICATION_DEPARTMENT";
        PostRecanalizationFindings => "POST_RECANALIZATION_FINDINGS";
        PostRecanalizationFindingType => "POST_RECANALIZATION_FINDING_TYPE";
        HemorrhagicTransformation => "HEMORRHAGIC_TRANSFORMATION";
        TiaClinicalSymptoms => "TIA_CLINICAL_SYMPTOMS";
        TiaSymptomsDuration => "TIA_SYMPTOMS_DURATION";
        BleedingSourceFound => "BLEEDING_SOURCE_FOUND";
        IchBleedingVolume => "ICH_BLEEDING_VOLUME";
        IchScore => "ICH_SCORE";
        IchTreatment => "ICH_TREATMENT";
        IchTreatmentType => "ICH_TREATMENT_TYPE";
        IchTreatmentTypeExtended => "ICH_TREATMENT_TYPE_EXTENDED";
        BleedingReasonFound => "BLEEDING_REASON_FOUND";
        BleedingReasonType => "BLEEDING_REASON_TYPE";
        BleedingAntidoteToAnticoagulants => "BLEEDING_ANTIDOTE_TO_ANTICOAGULANTS";
        AnticoagulantReversal => "ANTICOAGULANT_REVERSAL";
        AnticoagulantReversalGiven => "ANTICOAGULANT_REVERSAL_GIVEN";
        IntraventicularHemorrhage => "INTRAVENTICULAR_HEMORRHAGE";
        InfratentorialHemorrhage => "INFRATENTORIAL_HEMORRHAGE";
        SahTreatment => "SAH_TREATMENT";
        SahTreatmentType => "SAH_TREATMENT_TYPE";
        Nimodipine => "NIMODIPINE";
        HuntHessScore => "HUNT_HESS_SCORE";
        CvtTreatment => "CVT_TREATMENT";
        CvtTreatmentType => "CVT_TREATMENT_TYPE";
        PostAcuteCare => "POST_ACUTE_CARE";
        Craniectomy => "CRANIECTOMY";
        CraniectomyAgeGt60 => "CRANIECTOMY_AGE_GT60";
        CarotidArteriesImaging => "CAROTID_ARTERIES_IMAGING";
        CarotidStenosis => "CAROTID_STENOSIS";
        CarotidStenosisLevel => "CAROTID_STENOSIS_LEVEL";
        CarotidEndarterectomy => "CAROTID_ENDARTERECTOMY";
        CarotidEndarterectomyStenosisGt70 => "CAROTID_ENDARTERECTOMY_STENOSIS_GT70";
        AtrialFibrilationFlutter => "ATRIAL_FIBRILATION_FLUTTER";
        StrokeEtiologyKnownAis => "STROKE_ETIOLOGY_KNOWN_AIS";
        StrokeEtiologyTypeAis => "STROKE_ETIOLOGY_TYPE_AIS";
        StrokeEtiologyKnownAisTia => "STROKE_ETIOLOGY_KNOWN_AIS_TIA";
        StrokeEtiologyTypeAisTia => "STROKE_ETIOLOGY_TYPE_AIS_TIA";
        VteInterventionAis => "VTE_INTERVENTION_AIS";
        VteInterventionIch => "VTE_INTERVENTION_ICH";
        VteInterventionTypeAis => "VTE_INTERVENTION_TYPE_AIS";
        VteInterventionTypeIch => "VTE_INTERVENTION_TYPE_ICH";
        PostStrokeComplications => "POST_STROKE_COMPLICATIONS";
        PostStrokeComplicationsType => "POST_STROKE_COMPLICATIONS_TYPE";
        Day1TemperatureChecks => "DAY_1_TEMPERATURE_CHECKS";
        Day2TemperatureChecks => "DAY_2_TEMPERATURE_CHECKS";
        Day3TemperatureChecks => "DAY_3_TEMPERATURE_CHECKS";
        ParacetamolOnFever => "PARACETAMOL_ON_FEVER";
        Day1HyperglycemiaChecks => "DAY_1_HYPERGLYCEMIA_CHECKS";
        Day2HyperglycemiaChecks => "DAY_2_HYPERGLYCEMIA_CHECKS";
        Day3HyperglycemiaChecks => "DAY_3_HYPERGLYCEMIA_CHECKS";
        InsulinOnHyperglycemia => "INSULIN_ON_HYPERGLYCEMIA";
        SwallowingScreening => "SWALLOWING_SCREENING";
        SwallowingScreeningType => "SWALLOWING_SCREENING_TYPE";
        SwallowingScreeningPerformer => "SWALLOWING_SCREENING_PERFORMER";
        Physiotherapy => "PHYSIOTHERAPY";
        OccupationalTherapy => "OCCUPATIONAL_THERAPY";
        SpeechTherapy => "SPEECH_THERAPY";
        DischargeDestination => "DISCHARGE_DESTINATION";
        DischargeMedications => "DISCHARGE_MEDICATIONS";
        DischargeAnticoagulantsAfib => "DISCHARGE_ANTICOAGULANTS_AFIB";
        DischargeAnticoagulantTypeAfib => "DISCHARGE_ANTICOAGULANT_TYPE_AFIB";
        DischargeAntiplateletsNoAfib => "DISCHARGE_ANTIPLATELETS_NO_AFIB";
        DischargeAntiplateletTypeNoAfib => "DISCHARGE_ANTIPLATELET_TYPE_NO_AFIB";
        DischargeMrs => "DISCHARGE_MRS";
        SmokingCessation => "SMOKING_CESSATION";
        StrokeManagementAppointment => "STROKE_MANAGEMENT_APPOINTMENT";
        ThreeMonthMrs => "THREE_MONTH_MRS";
        HospitalStay => "HOSPITAL_STAY";
        DischargeNihss => "DISCHARGE_NIHSS";
        Dti => "DTI", ["door to imaging", "time to scan", "time to ct", "door-to-imaging time", "time until imaging", "time to first imaging", "time to initial scan", "initial ct timing"];
        OnsetToDoor => "ONSET_TO_DOOR";
        DoorToIvAntihypertensiveInitiation => "DOOR_TO_IV_ANTIHYPERTENSIVE_INITIATION";
        DoorToSysBpLt140 => "DOOR_TO_SYS_BP_LT140";
        IvAntihypertensiveToSysBpLt140 => "IV_ANTIHYPERTENSIVE_TO_SYS_BP_LT140";
        IvAntihypertensive => "IV_ANTIHYPERTENSIVE";
        AchievingSystolicPressureLt140 => "ACHIEVING_SYSTOLIC_PRESSURE_LT140";
        DoorToReversalInitiation => "DOOR_TO_REVERSAL_INITIATION";
        NoAnticoagulationReversalReason => "NO_ANTICOAGULATION_REVERSAL_REASON";
        NoIchTreatmentReason => "NO_ICH_TREATMENT_REASON";
        DoorToEvacuation => "DOOR_TO_EVACUATION";
    }
}
