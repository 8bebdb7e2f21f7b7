use crate::i18n::Language;

/// Localized user-facing strings for one language, addressed by dotted key.
///
/// Placeholders use `{name}` syntax and are filled by the translator.
#[derive(Debug, Clone)]
pub struct LanguageStrings {
    /// ISO 639-1 code of the catalog
    pub code: &'static str,

    entries: &'static [(&'static str, &'static str)],
}

impl LanguageStrings {
    /// Catalog for a language.
    pub fn for_language(language: Language) -> &'static LanguageStrings {
        match language.code() {
            "ar" => &ARABIC_STRINGS,
            "ku" => &KURDISH_STRINGS,
            _ => &ENGLISH_STRINGS,
        }
    }

    pub fn get(&self, key: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, value)| *value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> {
        self.entries.iter().map(|(key, _)| *key)
    }

    pub fn entries(&self) -> &'static [(&'static str, &'static str)] {
        self.entries
    }
}

// ==================== English Strings ====================

/// English strings (canonical catalog)
pub const ENGLISH_STRINGS: LanguageStrings = LanguageStrings {
    code: "en",
    entries: &[
        // Validation
        ("validation.service.required", "Please select a service"),
        ("validation.service.invalid", "Please choose one of the listed services"),
        ("validation.name.required", "Name is required"),
        ("validation.name.tooShort", "Name must be at least 2 characters"),
        ("validation.name.tooLong", "Name must be at most 50 characters"),
        ("validation.email.required", "Email is required"),
        ("validation.email.invalid", "Invalid email format"),
        ("validation.phone.required", "Phone number is required"),
        ("validation.phone.tooShort", "Phone number must be at least 10 digits"),
        ("validation.phone.tooLong", "Phone number must be at most 20 characters"),
        ("validation.phone.invalid", "Phone number may only contain digits, spaces, dashes, brackets and a leading +"),
        ("validation.experienceLevel.required", "Please select your experience level"),
        ("validation.experienceLevel.invalid", "Please choose one of the listed experience levels"),
        ("validation.groupSize.required", "Please enter the number of people"),
        ("validation.groupSize.invalid", "Group size must be a whole number"),
        ("validation.groupSize.range", "Group size must be between 1 and 50"),
        ("validation.specialRequests.tooLong", "Special requests must be at most 500 characters"),
        ("validation.date.required", "Please select a date"),
        ("validation.date.past", "Please choose today or a later date"),
        ("validation.time.required", "Please select a time"),
        ("validation.time.invalid", "Time must use the HH:MM format"),
        // Wizard
        ("booking.title", "Book Your Experience"),
        ("booking.steps.service", "Service"),
        ("booking.steps.details", "Details"),
        ("booking.steps.dateTime", "Date & Time"),
        ("booking.services.safari", "Horse Riding Safari"),
        ("booking.services.academy", "Riding Academy"),
        ("booking.services.private", "Private Lessons"),
        ("booking.services.event", "Special Event"),
        ("booking.experience.beginner", "Beginner (Never ridden)"),
        ("booking.experience.novice", "Novice (A few times)"),
        ("booking.experience.intermediate", "Intermediate (Comfortable)"),
        ("booking.experience.advanced", "Advanced (Expert rider)"),
        ("booking.dateTimeMissing", "Please select both a date and time to continue"),
        ("booking.success.title", "Booking Confirmed!"),
        ("booking.success.message", "Thank you, {name}! Your booking request has been received."),
        ("booking.success.contact", "We'll contact you at {phone} to confirm your booking."),
        ("booking.submission.failed", "We couldn't send your booking. Please try again."),
        ("booking.submission.cancelled", "Your booking was not sent."),
        // Calendar
        ("calendar.title", "Select Date & Time"),
        ("calendar.months.january", "January"),
        ("calendar.months.february", "February"),
        ("calendar.months.march", "March"),
        ("calendar.months.april", "April"),
        ("calendar.months.may", "May"),
        ("calendar.months.june", "June"),
        ("calendar.months.july", "July"),
        ("calendar.months.august", "August"),
        ("calendar.months.september", "September"),
        ("calendar.months.october", "October"),
        ("calendar.months.november", "November"),
        ("calendar.months.december", "December"),
        ("calendar.days.sun", "Sun"),
        ("calendar.days.mon", "Mon"),
        ("calendar.days.tue", "Tue"),
        ("calendar.days.wed", "Wed"),
        ("calendar.days.thu", "Thu"),
        ("calendar.days.fri", "Fri"),
        ("calendar.days.sat", "Sat"),
        ("calendar.times.8am", "8:00 AM"),
        ("calendar.times.10am", "10:00 AM"),
        ("calendar.times.12pm", "12:00 PM"),
        ("calendar.times.2pm", "2:00 PM"),
        ("calendar.times.4pm", "4:00 PM"),
        ("calendar.times.6pm", "6:00 PM"),
    ],
};

// ==================== Arabic Strings ====================

pub const ARABIC_STRINGS: LanguageStrings = LanguageStrings {
    code: "ar",
    entries: &[
        ("validation.service.required", "يرجى اختيار خدمة"),
        ("validation.service.invalid", "يرجى اختيار إحدى الخدمات المدرجة"),
        ("validation.name.required", "الاسم مطلوب"),
        ("validation.name.tooShort", "يجب أن يتكون الاسم من حرفين على الأقل"),
        ("validation.name.tooLong", "يجب ألا يتجاوز الاسم 50 حرفاً"),
        ("validation.email.required", "البريد الإلكتروني مطلوب"),
        ("validation.email.invalid", "صيغة البريد الإلكتروني غير صحيحة"),
        ("validation.phone.required", "رقم الهاتف مطلوب"),
        ("validation.phone.tooShort", "يجب أن يتكون رقم الهاتف من 10 أرقام على الأقل"),
        ("validation.phone.tooLong", "يجب ألا يتجاوز رقم الهاتف 20 خانة"),
        ("validation.phone.invalid", "يمكن أن يحتوي رقم الهاتف على أرقام ومسافات وشرطات وأقواس وعلامة + في البداية فقط"),
        ("validation.experienceLevel.required", "يرجى اختيار مستوى خبرتك"),
        ("validation.experienceLevel.invalid", "يرجى اختيار أحد مستويات الخبرة المدرجة"),
        ("validation.groupSize.required", "يرجى إدخال عدد الأشخاص"),
        ("validation.groupSize.invalid", "يجب أن يكون عدد الأشخاص رقماً صحيحاً"),
        ("validation.groupSize.range", "يجب أن يكون عدد الأشخاص بين 1 و 50"),
        ("validation.specialRequests.tooLong", "يجب ألا تتجاوز الطلبات الخاصة 500 حرف"),
        ("validation.date.required", "يرجى اختيار تاريخ"),
        ("validation.date.past", "يرجى اختيار تاريخ اليوم أو تاريخ لاحق"),
        ("validation.time.required", "يرجى اختيار وقت"),
        ("validation.time.invalid", "يجب أن يكون الوقت بصيغة HH:MM"),
        ("booking.title", "احجز تجربتك"),
        ("booking.steps.service", "الخدمة"),
        ("booking.steps.details", "التفاصيل"),
        ("booking.steps.dateTime", "التاريخ والوقت"),
        ("booking.services.safari", "سفاري ركوب الخيل"),
        ("booking.services.academy", "أكاديمية الفروسية"),
        ("booking.services.private", "دروس خاصة"),
        ("booking.services.event", "مناسبة خاصة"),
        ("booking.experience.beginner", "مبتدئ (لم أركب من قبل)"),
        ("booking.experience.novice", "مبتدئ متقدم (ركبت بضع مرات)"),
        ("booking.experience.intermediate", "متوسط (مرتاح على الخيل)"),
        ("booking.experience.advanced", "متقدم (فارس خبير)"),
        ("booking.dateTimeMissing", "يرجى اختيار التاريخ والوقت للمتابعة"),
        ("booking.success.title", "تم تأكيد الحجز!"),
        ("booking.success.message", "شكراً لك يا {name}! لقد استلمنا طلب الحجز الخاص بك."),
        ("booking.success.contact", "سنتواصل معك على الرقم {phone} لتأكيد الحجز."),
        ("booking.submission.failed", "تعذر إرسال الحجز. يرجى المحاولة مرة أخرى."),
        ("booking.submission.cancelled", "لم يتم إرسال الحجز."),
        ("calendar.title", "اختر التاريخ والوقت"),
        ("calendar.months.january", "كانون الثاني"),
        ("calendar.months.february", "شباط"),
        ("calendar.months.march", "آذار"),
        ("calendar.months.april", "نيسان"),
        ("calendar.months.may", "أيار"),
        ("calendar.months.june", "حزيران"),
        ("calendar.months.july", "تموز"),
        ("calendar.months.august", "آب"),
        ("calendar.months.september", "أيلول"),
        ("calendar.months.october", "تشرين الأول"),
        ("calendar.months.november", "تشرين الثاني"),
        ("calendar.months.december", "كانون الأول"),
        ("calendar.days.sun", "الأحد"),
        ("calendar.days.mon", "الاثنين"),
        ("calendar.days.tue", "الثلاثاء"),
        ("calendar.days.wed", "الأربعاء"),
        ("calendar.days.thu", "الخميس"),
        ("calendar.days.fri", "الجمعة"),
        ("calendar.days.sat", "السبت"),
        ("calendar.times.8am", "8:00 صباحاً"),
        ("calendar.times.10am", "10:00 صباحاً"),
        ("calendar.times.12pm", "12:00 ظهراً"),
        ("calendar.times.2pm", "2:00 مساءً"),
        ("calendar.times.4pm", "4:00 مساءً"),
        ("calendar.times.6pm", "6:00 مساءً"),
    ],
};

// ==================== Kurdish (Sorani) Strings ====================

pub const KURDISH_STRINGS: LanguageStrings = LanguageStrings {
    code: "ku",
    entries: &[
        ("validation.service.required", "تکایە خزمەتگوزارییەک هەڵبژێرە"),
        ("validation.service.invalid", "تکایە یەکێک لە خزمەتگوزارییە دیاریکراوەکان هەڵبژێرە"),
        ("validation.name.required", "ناو پێویستە"),
        ("validation.name.tooShort", "ناو دەبێت لانیکەم ٢ پیت بێت"),
        ("validation.name.tooLong", "ناو نابێت لە ٥٠ پیت زیاتر بێت"),
        ("validation.email.required", "ئیمەیڵ پێویستە"),
        ("validation.email.invalid", "شێوازی ئیمەیڵ هەڵەیە"),
        ("validation.phone.required", "ژمارەی تەلەفۆن پێویستە"),
        ("validation.phone.tooShort", "ژمارەی تەلەفۆن دەبێت لانیکەم ١٠ ژمارە بێت"),
        ("validation.phone.tooLong", "ژمارەی تەلەفۆن نابێت لە ٢٠ پیت زیاتر بێت"),
        ("validation.phone.invalid", "ژمارەی تەلەفۆن تەنها ژمارە، بۆشایی، هێڵ، کەوانە و + لە سەرەتادا لەخۆدەگرێت"),
        ("validation.experienceLevel.required", "تکایە ئاستی ئەزموونت هەڵبژێرە"),
        ("validation.experienceLevel.invalid", "تکایە یەکێک لە ئاستە دیاریکراوەکان هەڵبژێرە"),
        ("validation.groupSize.required", "تکایە ژمارەی کەسەکان بنووسە"),
        ("validation.groupSize.invalid", "ژمارەی کەسەکان دەبێت ژمارەیەکی تەواو بێت"),
        ("validation.groupSize.range", "ژمارەی کەسەکان دەبێت لە نێوان ١ و ٥٠ بێت"),
        ("validation.specialRequests.tooLong", "داواکارییە تایبەتەکان نابێت لە ٥٠٠ پیت زیاتر بن"),
        ("validation.date.required", "تکایە بەروارێک هەڵبژێرە"),
        ("validation.date.past", "تکایە ئەمڕۆ یان بەروارێکی دواتر هەڵبژێرە"),
        ("validation.time.required", "تکایە کاتێک هەڵبژێرە"),
        ("validation.time.invalid", "کات دەبێت بە شێوازی HH:MM بێت"),
        ("booking.title", "ئەزموونەکەت حیجز بکە"),
        ("booking.steps.service", "خزمەتگوزاری"),
        ("booking.steps.details", "وردەکاری"),
        ("booking.steps.dateTime", "بەروار و کات"),
        ("booking.services.safari", "سەفاری ئەسپسواری"),
        ("booking.services.academy", "ئەکادیمیای ئەسپسواری"),
        ("booking.services.private", "وانەی تایبەت"),
        ("booking.services.event", "بۆنەی تایبەت"),
        ("booking.experience.beginner", "سەرەتایی (هەرگیز سواری ئەسپ نەبووم)"),
        ("booking.experience.novice", "نوێ (چەند جارێک)"),
        ("booking.experience.intermediate", "مامناوەند (ئاسوودەم)"),
        ("booking.experience.advanced", "پێشکەوتوو (سوارچاکی شارەزا)"),
        ("booking.dateTimeMissing", "تکایە بەروار و کات هەردووکیان هەڵبژێرە بۆ بەردەوامبوون"),
        ("booking.success.title", "حیجزەکە پشتڕاستکرایەوە!"),
        ("booking.success.message", "سوپاس {name}! داواکاری حیجزەکەت وەرگیرا."),
        ("booking.success.contact", "لەسەر ژمارە {phone} پەیوەندیت پێوە دەکەین بۆ پشتڕاستکردنەوەی حیجزەکە."),
        ("booking.submission.failed", "نەمانتوانی حیجزەکەت بنێرین. تکایە دووبارە هەوڵ بدەرەوە."),
        ("booking.submission.cancelled", "حیجزەکەت نەنێردرا."),
        ("calendar.title", "بەروار و کات هەڵبژێرە"),
        ("calendar.months.january", "کانوونی دووەم"),
        ("calendar.months.february", "شوبات"),
        ("calendar.months.march", "ئازار"),
        ("calendar.months.april", "نیسان"),
        ("calendar.months.may", "ئایار"),
        ("calendar.months.june", "حوزەیران"),
        ("calendar.months.july", "تەممووز"),
        ("calendar.months.august", "ئاب"),
        ("calendar.months.september", "ئەیلوول"),
        ("calendar.months.october", "تشرینی یەکەم"),
        ("calendar.months.november", "تشرینی دووەم"),
        ("calendar.months.december", "کانوونی یەکەم"),
        ("calendar.days.sun", "یەکشەممە"),
        ("calendar.days.mon", "دووشەممە"),
        ("calendar.days.tue", "سێشەممە"),
        ("calendar.days.wed", "چوارشەممە"),
        ("calendar.days.thu", "پێنجشەممە"),
        ("calendar.days.fri", "هەینی"),
        ("calendar.days.sat", "شەممە"),
        ("calendar.times.8am", "8:00 بەیانی"),
        ("calendar.times.10am", "10:00 بەیانی"),
        ("calendar.times.12pm", "12:00 نیوەڕۆ"),
        ("calendar.times.2pm", "2:00 دوای نیوەڕۆ"),
        ("calendar.times.4pm", "4:00 دوای نیوەڕۆ"),
        ("calendar.times.6pm", "6:00 ئێوارە"),
    ],
};
